//! Authentication extractor (the `protect` gate) and session cookie helpers.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::db;
use crate::domain::User;
use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "studio_session";

/// Authenticated request context.
/// Add this as a handler parameter to require a valid session; requests
/// without one are answered with 401 before the handler runs.
#[derive(Clone)]
pub struct AuthContext {
    pub user: User,
}

impl AuthContext {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthorized("Not authorized, no token"))?;

        let user_id = state.tokens.verify(&token).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            ApiError::Unauthorized("Not authorized, token failed")
        })?;

        let conn = db::try_lock(&state.db)?;
        let user = db::get_user_by_id(&conn, &user_id)?.ok_or_else(|| {
            tracing::debug!("Session token for unknown user {}", user_id);
            ApiError::Unauthorized("Not authorized, token failed")
        })?;

        Ok(AuthContext { user })
    }
}

/// HttpOnly session cookie carrying a freshly issued token
pub fn session_cookie(state: &AppState, user_id: &str) -> Cookie<'static> {
    let lifetime = state.tokens.lifetime();
    Cookie::build((SESSION_COOKIE_NAME, state.tokens.issue(user_id)))
        .path("/")
        .http_only(true)
        .secure(state.secure_cookies)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(lifetime.num_seconds()))
        .build()
}

/// Empty, already-expired session cookie
pub fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0))
        .build()
}

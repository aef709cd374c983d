//! Authentication handlers for register, login, logout and the profile.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::middleware::{cleared_session_cookie, session_cookie, AuthContext};
use super::password;
use crate::db::{self, LogOnError, NewUser, UserChanges};
use crate::domain::user::normalize_email;
use crate::domain::{PublicUser, Theme};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::AppState;

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub theme: Option<String>,
}

/// Loose shape check; the address is never contacted
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(form): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let email = normalize_email(&form.email);

    if first_name.is_empty() || last_name.is_empty() || form.password.is_empty() {
        return Err(ApiError::BadRequest("Invalid user data".to_string()));
    }
    if !is_plausible_email(&email) {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }

    // Hash before taking the db lock
    let password_hash =
        password::hash_password(&form.password).map_err(|e| ApiError::Password(e.to_string()))?;

    let conn = db::try_lock(&state.db)?;
    if db::email_exists(&conn, &email)? {
        return Err(ApiError::UserExists);
    }

    let user = db::create_user(
        &conn,
        &NewUser {
            first_name,
            last_name,
            email: &email,
            password_hash: &password_hash,
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            ApiError::UserExists
        }
        other => ApiError::Database(other),
    })?;
    drop(conn);

    tracing::info!("Registered user {}", user.id);

    let cookie = session_cookie(&state, &user.id);
    Ok((StatusCode::CREATED, jar.add(cookie), Json(PublicUser::from(&user))))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(form): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(ApiError::InvalidCredentials);
    }
    let email = normalize_email(&form.email);

    let user = {
        let conn = db::try_lock(&state.db)?;
        db::get_user_by_email(&conn, &email)?
    };

    let user = match user {
        Some(user) if password::verify_password(&form.password, &user.password_hash) => user,
        _ => return Err(ApiError::InvalidCredentials),
    };

    // Log but don't fail on error
    if let Some(conn) = db::try_lock(&state.db).log_warn("Failed to lock db for last login") {
        db::update_last_login(&conn, &user.id)
            .log_warn(&format!("Failed to update last login for user {}", user.id));
    }

    let cookie = session_cookie(&state, &user.id);
    Ok((StatusCode::OK, jar.add(cookie), Json(PublicUser::from(&user))))
}

/// POST /api/users/logout
///
/// Tokens are self-contained, so logging out only clears the cookie.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::OK,
        jar.add(cleared_session_cookie()),
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    )
}

/// GET /api/users/profile
pub async fn profile(auth: AuthContext) -> Json<PublicUser> {
    Json(PublicUser::from(&auth.user))
}

/// PUT /api/users/profile
pub async fn update_profile(
    auth: AuthContext,
    State(state): State<AppState>,
    ApiJson(form): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<PublicUser>> {
    let theme = match form.theme.as_deref() {
        Some(raw) => Some(
            Theme::from_str(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown theme: {raw}")))?,
        ),
        None => None,
    };
    let first_name = non_blank(form.first_name, "First name")?;
    let last_name = non_blank(form.last_name, "Last name")?;

    let conn = db::try_lock(&state.db)?;
    let user = db::update_user(
        &conn,
        auth.user_id(),
        &UserChanges {
            first_name,
            last_name,
            theme,
        },
    )?
    .ok_or(ApiError::Unauthorized("Not authorized, token failed"))?;

    Ok(Json(PublicUser::from(&user)))
}

fn non_blank(value: Option<String>, field: &str) -> ApiResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(ApiError::BadRequest(format!("{field} cannot be empty")))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

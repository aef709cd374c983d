//! API error taxonomy and its HTTP mapping.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::db::DbLockError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, invalid or expired session
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Id does not resolve to a project the caller owns
    #[error("Project not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("User already exists")]
    UserExists,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    Lock(#[from] DbLockError),

    #[error("Password hashing failed: {0}")]
    Password(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// JSON request body whose rejections answer in the `{"message"}` shape
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::UserExists => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Lock(_) | Self::Password(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server-side failures are logged here and never described to the caller
        let message = if status.is_server_error() {
            tracing::error!("{}", self);
            "Server Error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::UserExists.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthorized("Not authorized, no token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(DbLockError).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let response = ApiError::Database(rusqlite::Error::InvalidQuery).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

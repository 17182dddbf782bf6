//! Application error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    /// The identity provider could not answer; surfaced as-is.
    #[error("Identity provider unavailable: {0}")]
    Provider(String),

    #[error("Auth state channel closed")]
    AuthStateClosed,

    #[error("URL encoding error: {0}")]
    UrlEncode(#[from] serde_urlencoded::ser::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidPattern { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Jwt(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Provider(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Identity provider unavailable: {}", msg),
            ),
            AppError::AuthStateClosed => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::UrlEncode(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("URL encoding error: {}", e),
            ),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

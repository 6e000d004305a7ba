//! HTTP error mapping.
//!
//! Every failure a handler can return becomes `{ "error": ..., "code": ... }`
//! with a status chosen here. Database details never reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fantrax_core::error::CoreError;
use fantrax_songlink::ResolveError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected input or credentials.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The submitted URL could not be turned into album links.
    #[error("Could not fetch album data: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Core(CoreError::Validation(_)) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Core(CoreError::Unauthorized(_)) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Core(CoreError::Forbidden(_)) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Resolve(_) => (StatusCode::BAD_REQUEST, "RESOLVE_FAILED"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Message shown to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Core(
                CoreError::Validation(msg) | CoreError::Unauthorized(msg) | CoreError::Forbidden(msg),
            ) => msg.clone(),
            Self::Resolve(_) => self.to_string(),
            Self::Database(err) => {
                tracing::error!(error = %err, "Database error");
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = json!({
            "error": self.public_message(),
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

// =============================================================================
// STORAGE ERROR
// =============================================================================

/// Failure reported by any repository implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Lock poisoning in the in-memory stores.
    pub fn poisoned<E: std::fmt::Display>(err: E) -> Self {
        Self::Internal(err.to_string())
    }
}

// =============================================================================
// RESPONSE BODIES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Renders an error body. Internal failures are logged with their detail and
/// replaced by a generic message.
pub fn error_response(status: StatusCode, message: String) -> Response {
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(status = status.as_u16(), "{}", message);
        return (
            status,
            Json(ErrorResponse::new("An internal error occurred. Please try again.")),
        )
            .into_response();
    }

    (status, Json(ErrorResponse::new(message))).into_response()
}

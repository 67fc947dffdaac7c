use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::model::{PasswordResetCode, User};
use crate::modules::shared::{error_response, StoreError, StoreResult};

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Identity and credential storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> StoreResult<()>;
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// `exclude_id` leaves one row out of the check (the user being edited).
    async fn username_taken(&self, username: &str, exclude_id: Option<&str>) -> StoreResult<bool>;
    async fn email_taken(&self, email: &str, exclude_id: Option<&str>) -> StoreResult<bool>;
    /// All users, most recently joined first.
    async fn list_newest_first(&self) -> StoreResult<Vec<User>>;
    /// Persists username, email, first and last name.
    async fn update_profile(&self, user: &User) -> StoreResult<()>;
    async fn update_password(&self, user_id: &str, password_hash: &str) -> StoreResult<()>;
    /// Returns `false` when no such user existed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait PasswordResetCodeRepository: Send + Sync {
    /// Creates the user's row or overwrites code, `created_at` and `is_used`.
    async fn upsert(&self, code: &PasswordResetCode) -> StoreResult<()>;
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<PasswordResetCode>>;
    async fn mark_used(&self, user_id: &str) -> StoreResult<()>;
    async fn delete_for_user(&self, user_id: &str) -> StoreResult<()>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Username already taken.")]
    UsernameTaken,

    #[error("Email already registered.")]
    EmailTaken,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Authentication required.")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Hashing(_) | Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Hashing(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

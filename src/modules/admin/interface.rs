use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::modules::auth::model::User;
use crate::modules::shared::{error_response, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("You cannot delete your own account.")]
    CannotDeleteSelf,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Hashing error: {0}")]
    Hashing(String),
}

impl AdminError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) | Self::CannotDeleteSelf => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<argon2::password_hash::Error> for AdminError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Hashing(err.to_string())
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

/// Entry guard for every admin operation.
pub fn require_admin(caller: &User) -> Result<(), AdminError> {
    if caller.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = %caller.id, "Non-admin attempted an admin operation");
        Err(AdminError::Forbidden)
    }
}

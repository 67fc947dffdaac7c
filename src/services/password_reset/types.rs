use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::modules::shared::{error_response, StoreError};
use crate::services::hashing::PasswordPolicyError;
use crate::services::mailer::MailError;

/// Stage the client should present next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetStep {
    Email,
    Code,
    NewPassword,
    Done,
}

/// One submission of the forgot-password form. The `step` token only selects
/// the branch; it grants nothing.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ResetSubmission {
    Email {
        #[serde(default)]
        email: String,
    },
    Verify {
        #[serde(default)]
        email: String,
        #[serde(default)]
        reset_code: String,
    },
    Reset {
        #[serde(default)]
        email: String,
        #[serde(default)]
        new_password: String,
        #[serde(default)]
        confirm_password: String,
    },
}

impl ResetSubmission {
    pub fn step_name(&self) -> &'static str {
        match self {
            Self::Email { .. } => "email",
            Self::Verify { .. } => "verify",
            Self::Reset { .. } => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub step: ResetStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub message: String,
}

impl ResetOutcome {
    pub fn new(step: ResetStep, email: Option<String>, message: impl Into<String>) -> Self {
        Self {
            step,
            email,
            message: message.into(),
        }
    }
}

// =============================================================================
// FAILURES
// =============================================================================

/// Recoverable reasons a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetFailure {
    MissingEmail,
    InvalidRequest,
    Expired,
    AlreadyUsed,
    CodeMismatch,
    MissingPassword,
    PasswordMismatch,
    PasswordTooShort,
}

impl ResetFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingEmail => "Please enter your email address.",
            Self::InvalidRequest => "Invalid request. Please start over.",
            Self::Expired => "The verification code has expired. Please request a new one.",
            Self::AlreadyUsed => "This verification code has already been used. Please request a new one.",
            Self::CodeMismatch => "Invalid verification code. Please try again.",
            Self::MissingPassword => "Please fill in both password fields.",
            Self::PasswordMismatch => "Passwords do not match.",
            Self::PasswordTooShort => "Password must be at least 6 characters long.",
        }
    }

    /// Where the client goes back to after this failure.
    pub fn fallback_step(&self) -> ResetStep {
        match self {
            Self::MissingEmail | Self::InvalidRequest | Self::Expired | Self::AlreadyUsed => {
                ResetStep::Email
            }
            Self::CodeMismatch => ResetStep::Code,
            Self::MissingPassword | Self::PasswordMismatch | Self::PasswordTooShort => {
                ResetStep::NewPassword
            }
        }
    }
}

impl fmt::Display for ResetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<PasswordPolicyError> for ResetFailure {
    fn from(err: PasswordPolicyError) -> Self {
        match err {
            PasswordPolicyError::Mismatch => Self::PasswordMismatch,
            PasswordPolicyError::TooShort => Self::PasswordTooShort,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    #[error("{failure}")]
    Rejected {
        failure: ResetFailure,
        email: String,
    },

    #[error("Failed to send the reset email. Please try again later.")]
    Delivery(#[source] MailError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Hashing error: {0}")]
    Hashing(String),
}

impl ResetError {
    pub fn rejected(failure: ResetFailure, email: &str) -> Self {
        Self::Rejected {
            failure,
            email: email.to_string(),
        }
    }

    /// What the client should show after a rejection. The email is echoed
    /// unless the flow restarts from the beginning.
    pub fn outcome(&self) -> Option<ResetOutcome> {
        match self {
            Self::Rejected { failure, email } => {
                let step = failure.fallback_step();
                let email = (step != ResetStep::Email).then(|| email.clone());
                Some(ResetOutcome::new(step, email, failure.message()))
            }
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected { .. } => StatusCode::BAD_REQUEST,
            Self::Delivery(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<argon2::password_hash::Error> for ResetError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Hashing(err.to_string())
    }
}

impl IntoResponse for ResetError {
    fn into_response(self) -> Response {
        if let Some(outcome) = self.outcome() {
            return (self.status_code(), Json(outcome)).into_response();
        }
        if let Self::Delivery(source) = &self {
            tracing::error!(error = %source, "Password reset email could not be delivered");
        }
        error_response(self.status_code(), self.to_string())
    }
}

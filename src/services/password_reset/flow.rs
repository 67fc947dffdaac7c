use crate::modules::auth::interface::{PasswordResetCodeRepository, UserRepository};
use crate::modules::auth::model::{PasswordResetCode, RESET_CODE_VALIDITY_MINUTES};
use crate::services::clock::Clock;
use crate::services::hashing;
use crate::services::mailer::Mailer;

use super::code::generate_code;
use super::types::{ResetError, ResetFailure, ResetOutcome, ResetStep, ResetSubmission};

pub const RESET_EMAIL_SUBJECT: &str = "Password Reset Code";

/// Drives one forgot-password submission against the stored code row.
pub struct PasswordResetFlow<'a> {
    users: &'a dyn UserRepository,
    codes: &'a dyn PasswordResetCodeRepository,
    mailer: &'a dyn Mailer,
    clock: &'a (dyn Clock + Send + Sync),
    from_address: &'a str,
}

impl<'a> PasswordResetFlow<'a> {
    pub fn new(
        users: &'a dyn UserRepository,
        codes: &'a dyn PasswordResetCodeRepository,
        mailer: &'a dyn Mailer,
        clock: &'a (dyn Clock + Send + Sync),
        from_address: &'a str,
    ) -> Self {
        Self {
            users,
            codes,
            mailer,
            clock,
            from_address,
        }
    }

    pub async fn handle(&self, submission: ResetSubmission) -> Result<ResetOutcome, ResetError> {
        match submission {
            ResetSubmission::Email { email } => self.request(&email).await,
            ResetSubmission::Verify { email, reset_code } => self.verify(&email, &reset_code).await,
            ResetSubmission::Reset {
                email,
                new_password,
                confirm_password,
            } => self.reset(&email, &new_password, &confirm_password).await,
        }
    }

    /// Issues (or re-issues) a code and mails it. Unknown addresses get the
    /// same kind of informational answer so accounts cannot be enumerated.
    pub async fn request(&self, email: &str) -> Result<ResetOutcome, ResetError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ResetError::rejected(ResetFailure::MissingEmail, email));
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for an unregistered address");
            return Ok(ResetOutcome::new(
                ResetStep::Email,
                None,
                "If an account exists for that email, a verification code has been sent.",
            ));
        };

        let code = generate_code();
        self.codes
            .upsert(&PasswordResetCode {
                user_id: user.id.clone(),
                code: code.clone(),
                created_at: self.clock.utc(),
                is_used: false,
            })
            .await?;

        let body = format!(
            "Hello {},\n\n\
             Your password reset code is: {}\n\n\
             This code will expire in {} minutes.\n\n\
             If you did not request a password reset, please ignore this email.",
            user.username, code, RESET_CODE_VALIDITY_MINUTES
        );
        self.mailer
            .send(RESET_EMAIL_SUBJECT, &body, self.from_address, &[user.email.clone()])
            .await
            .map_err(ResetError::Delivery)?;

        tracing::info!(user_id = %user.id, "Password reset code issued");

        Ok(ResetOutcome::new(
            ResetStep::Code,
            Some(email.to_string()),
            "A verification code has been sent to your email.",
        ))
    }

    /// Checks the submitted code. A match does not consume it; only a
    /// completed reset does.
    pub async fn verify(&self, email: &str, submitted_code: &str) -> Result<ResetOutcome, ResetError> {
        let email = email.trim();
        let stored = self.stored_code(email).await?;

        if stored.is_expired_at(self.clock.utc()) {
            return Err(ResetError::rejected(ResetFailure::Expired, email));
        }

        if stored.code != submitted_code.trim() {
            return Err(ResetError::rejected(ResetFailure::CodeMismatch, email));
        }

        Ok(ResetOutcome::new(
            ResetStep::NewPassword,
            Some(email.to_string()),
            "Code verified. Please enter your new password.",
        ))
    }

    /// Sets the new password. Expiry and the used flag are checked again here
    /// since the client may arrive long after verifying, or submit twice.
    pub async fn reset(
        &self,
        email: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ResetOutcome, ResetError> {
        let email = email.trim();
        if new_password.is_empty() || confirm_password.is_empty() {
            return Err(ResetError::rejected(ResetFailure::MissingPassword, email));
        }
        hashing::check_new_password(new_password, confirm_password)
            .map_err(|e| ResetError::rejected(e.into(), email))?;

        let stored = self.stored_code(email).await?;
        if stored.is_expired_at(self.clock.utc()) {
            return Err(ResetError::rejected(ResetFailure::Expired, email));
        }
        if stored.is_used {
            return Err(ResetError::rejected(ResetFailure::AlreadyUsed, email));
        }

        let password_hash = hashing::hash_password(new_password)?;
        self.users
            .update_password(&stored.user_id, &password_hash)
            .await?;
        self.codes.mark_used(&stored.user_id).await?;

        tracing::info!(user_id = %stored.user_id, "Password reset completed");

        Ok(ResetOutcome::new(
            ResetStep::Done,
            None,
            "Your password has been reset successfully. You can now log in.",
        ))
    }

    async fn stored_code(&self, email: &str) -> Result<PasswordResetCode, ResetError> {
        let invalid = || ResetError::rejected(ResetFailure::InvalidRequest, email);

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;
        self.codes
            .find_by_user(&user.id)
            .await?
            .ok_or_else(invalid)
    }
}

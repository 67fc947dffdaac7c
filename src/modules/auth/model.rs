use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Capability check used by every admin operation.
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// How long a reset code stays usable after it was (re)issued.
pub const RESET_CODE_VALIDITY_MINUTES: i64 = 15;

/// At most one row per user; a new request overwrites code, timestamp and the
/// used flag.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetCode {
    pub user_id: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub is_used: bool,
}

impl PasswordResetCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::minutes(RESET_CODE_VALIDITY_MINUTES)
    }
}

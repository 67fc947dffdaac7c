pub mod clock;
pub mod hashing;
pub mod jwt;
pub mod mailer;
pub mod metrics;
pub mod password_reset;
pub mod security;

//! Three-step password reset keyed by email address: request a code, verify
//! it, then choose a new password. Nothing about the client's position in the
//! flow is stored; each submission names its step and the stored code row is
//! re-validated every time.

pub mod code;
pub mod flow;
pub mod types;

pub use code::generate_code;
pub use flow::PasswordResetFlow;
pub use types::*;

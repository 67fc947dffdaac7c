pub mod admin;
pub mod auth;
pub mod shared;
pub mod tasks;

pub mod controller;
pub mod crud;
pub mod interface;
pub mod memory;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod schema;

pub use middleware::require_auth;
pub use routes::auth_routes;

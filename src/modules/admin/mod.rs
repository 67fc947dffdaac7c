pub mod controller;
pub mod interface;
pub mod routes;
pub mod schema;
pub mod service;

pub use routes::admin_routes;

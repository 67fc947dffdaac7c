use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::modules::auth::require_auth;
use crate::AppState;

pub fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(controller::dashboard))
        .route("/create", post(controller::create_user))
        .route("/edit/{id}", post(controller::edit_user))
        .route("/password/{id}", post(controller::change_password))
        .route("/delete/{id}", post(controller::delete_user))
        .route("/tasks/{id}", get(controller::user_tasks))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

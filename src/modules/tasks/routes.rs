use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::modules::auth::require_auth;
use crate::AppState;

pub fn task_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(controller::create_task))
        .route("/my-tasks", get(controller::my_tasks))
        .route("/calendar", get(controller::calendar))
        .route("/{id}", get(controller::view_task))
        .route("/{id}/edit", post(controller::edit_task))
        .route("/{id}/delete", post(controller::delete_task))
        .route("/{id}/complete", post(controller::toggle_complete))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::{controller, middleware::require_auth};
use crate::AppState;

pub fn auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/profile", get(controller::profile))
        .route("/change-password", post(controller::change_password))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(controller::register))
        .route("/login", post(controller::login))
        .route("/logout", get(controller::logout).post(controller::logout))
        .route("/forgot-password", post(controller::forgot_password))
        .merge(protected)
}

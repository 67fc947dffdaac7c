pub mod config;
pub mod modules;
pub mod services;

use axum::{
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::DbPool;
use modules::admin::admin_routes;
use modules::auth::{
    auth_routes,
    crud::{ResetCodeCrud, UserCrud},
    interface::{PasswordResetCodeRepository, UserRepository},
};
use modules::shared::error_response;
use modules::tasks::{crud::TaskCrud, interface::TaskRepository, task_routes};
use services::clock::{DefaultClock, SharedClock};
use services::jwt::JwtService;
use services::mailer::Mailer;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::security::security_headers;

pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub reset_codes: Arc<dyn PasswordResetCodeRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub clock: SharedClock,
    pub jwt_service: JwtService,
    pub mail_from: String,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    /// MySQL-backed state with the wall clock.
    pub fn with_mysql(
        db: DbPool,
        mailer: Arc<dyn Mailer>,
        jwt_service: JwtService,
        mail_from: String,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            users: Arc::new(UserCrud::new(db.clone())),
            reset_codes: Arc::new(ResetCodeCrud::new(db.clone())),
            tasks: Arc::new(TaskCrud::new(db)),
            mailer,
            clock: Arc::new(DefaultClock),
            jwt_service,
            mail_from,
            metrics,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);
    let metrics = state.metrics.clone();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/tasks", task_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .with_state(state)
}

async fn root() -> &'static str {
    "Taskboard API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.export() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

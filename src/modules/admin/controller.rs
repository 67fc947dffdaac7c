use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use super::interface::AdminError;
use super::schema::{
    AdminPasswordRequest, AdminUserResponse, CreateUserRequest, DashboardResponse, EditUserRequest,
    UserTasksResponse,
};
use super::service::AdminService;
use crate::modules::auth::model::User;
use crate::modules::shared::MessageResponse;
use crate::AppState;

fn service(state: &AppState) -> AdminService<'_> {
    AdminService::new(
        state.users.as_ref(),
        state.reset_codes.as_ref(),
        state.tasks.as_ref(),
        state.clock.as_ref(),
    )
}

// =============================================================================
// GET /admin/dashboard
// =============================================================================

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<User>,
) -> Result<Json<DashboardResponse>, AdminError> {
    let dashboard = service(&state).dashboard(&caller).await?;

    Ok(Json(DashboardResponse {
        users: dashboard.users.into_iter().map(Into::into).collect(),
        total_users: dashboard.total_users,
        active_users: dashboard.active_users,
        admin_count: dashboard.admin_count,
        total_tasks: dashboard.total_tasks,
    }))
}

// =============================================================================
// POST /admin/create
// =============================================================================

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<User>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AdminUserResponse>), AdminError> {
    let user = service(&state).create_user(&caller, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminUserResponse {
            message: format!("User '{}' created successfully.", user.username),
            user: user.into(),
        }),
    ))
}

// =============================================================================
// POST /admin/edit/{id}
// =============================================================================

pub async fn edit_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<User>,
    Path(id): Path<String>,
    Json(req): Json<EditUserRequest>,
) -> Result<Json<AdminUserResponse>, AdminError> {
    let user = service(&state).edit_user(&caller, &id, &req).await?;

    Ok(Json(AdminUserResponse {
        message: format!("User '{}' updated successfully.", user.username),
        user: user.into(),
    }))
}

// =============================================================================
// POST /admin/password/{id}
// =============================================================================

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<User>,
    Path(id): Path<String>,
    Json(req): Json<AdminPasswordRequest>,
) -> Result<Json<MessageResponse>, AdminError> {
    let user = service(&state).change_password(&caller, &id, &req).await?;

    Ok(Json(MessageResponse::new(format!(
        "Password for '{}' changed successfully.",
        user.username
    ))))
}

// =============================================================================
// POST /admin/delete/{id}
// =============================================================================

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AdminError> {
    let user = service(&state).delete_user(&caller, &id).await?;

    Ok(Json(MessageResponse::new(format!(
        "User '{}' deleted successfully.",
        user.username
    ))))
}

// =============================================================================
// GET /admin/tasks/{id}
// =============================================================================

pub async fn user_tasks(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<UserTasksResponse>, AdminError> {
    let (user, tasks) = service(&state).tasks_for(&caller, &id).await?;

    Ok(Json(UserTasksResponse {
        user: user.into(),
        tasks: tasks.into_iter().map(Into::into).collect(),
    }))
}

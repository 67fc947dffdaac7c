use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Datelike;
use std::sync::Arc;

use super::interface::TaskError;
use super::schema::{
    CalendarQuery, CalendarResponse, TaskListResponse, TaskMessageResponse, TaskRequest, TaskResponse,
};
use super::store::TaskStore;
use crate::modules::auth::model::User;
use crate::modules::shared::MessageResponse;
use crate::services::clock::Clock;
use crate::AppState;

fn store(state: &AppState) -> TaskStore<'_> {
    TaskStore::new(state.tasks.as_ref(), state.clock.as_ref())
}

// =============================================================================
// POST /tasks/create
// =============================================================================

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(req): Json<TaskRequest>,
) -> Result<(StatusCode, Json<TaskMessageResponse>), TaskError> {
    let task = store(&state).create(&user.id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskMessageResponse {
            message: "Task created successfully.",
            task: task.into(),
        }),
    ))
}

// =============================================================================
// GET /tasks/my-tasks
// =============================================================================

pub async fn my_tasks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<TaskListResponse>, TaskError> {
    let summary = store(&state).list(&user.id).await?;

    Ok(Json(TaskListResponse {
        tasks: summary.tasks.into_iter().map(Into::into).collect(),
        completed_count: summary.completed_count,
        in_progress_count: summary.in_progress_count,
        todo_count: summary.todo_count,
    }))
}

// =============================================================================
// GET /tasks/{id}
// =============================================================================

pub async fn view_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, TaskError> {
    let task = store(&state).get(&user.id, &id).await?;
    Ok(Json(task.into()))
}

// =============================================================================
// POST /tasks/{id}/edit
// =============================================================================

pub async fn edit_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(req): Json<TaskRequest>,
) -> Result<Json<TaskMessageResponse>, TaskError> {
    let task = store(&state).update(&user.id, &id, &req).await?;

    Ok(Json(TaskMessageResponse {
        message: "Task updated successfully.",
        task: task.into(),
    }))
}

// =============================================================================
// POST /tasks/{id}/delete
// =============================================================================

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, TaskError> {
    store(&state).delete(&user.id, &id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully.")))
}

// =============================================================================
// POST /tasks/{id}/complete
// =============================================================================

pub async fn toggle_complete(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<TaskMessageResponse>, TaskError> {
    let task = store(&state).toggle_completion(&user.id, &id).await?;

    let message = if task.is_completed {
        "Task marked as completed."
    } else {
        "Task marked as incomplete."
    };

    Ok(Json(TaskMessageResponse {
        message,
        task: task.into(),
    }))
}

// =============================================================================
// GET /tasks/calendar
// =============================================================================

/// Missing year or month falls back to the current UTC date.
pub async fn calendar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, TaskError> {
    let today = state.clock.utc();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month() as i32);

    let month_tasks = store(&state).by_month(&user.id, year, month).await?;

    Ok(Json(CalendarResponse {
        year: month_tasks.year,
        month: month_tasks.month,
        days: month_tasks
            .days
            .into_iter()
            .map(|(day, tasks)| (day, tasks.into_iter().map(Into::into).collect()))
            .collect(),
    }))
}

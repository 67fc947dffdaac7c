use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;

use super::model::Task;
use crate::modules::shared::{error_response, StoreError, StoreResult};

// =============================================================================
// REPOSITORY TRAIT
// =============================================================================

/// Task rows. Every lookup that takes `owner_id` only ever sees that owner's
/// rows.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: &Task) -> StoreResult<()>;
    async fn find_for_owner(&self, owner_id: &str, id: &str) -> StoreResult<Option<Task>>;
    /// Newest created first.
    async fn list_for_owner(&self, owner_id: &str) -> StoreResult<Vec<Task>>;
    /// Tasks due within `[first, last]`, by due date, newest created first
    /// within a day.
    async fn list_due_between(&self, owner_id: &str, first: NaiveDate, last: NaiveDate) -> StoreResult<Vec<Task>>;
    /// Rewrites every mutable column of the owner's row.
    async fn update(&self, task: &Task) -> StoreResult<()>;
    /// Returns `false` when the owner has no such task.
    async fn delete_for_owner(&self, owner_id: &str, id: &str) -> StoreResult<bool>;
    async fn delete_all_for_owner(&self, owner_id: &str) -> StoreResult<u64>;
    async fn count_all(&self) -> StoreResult<i64>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Absent and not-yours are deliberately indistinguishable.
    #[error("Task not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

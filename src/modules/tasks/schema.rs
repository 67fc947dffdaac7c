use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::model::Task;

// =============================================================================
// CREATE / EDIT
// =============================================================================

/// Full field set for create and edit. Labels are taken as given; only the due
/// date is parsed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due_date: NaiveDate,
    pub status: String,
    pub category: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            priority: task.priority,
            due_date: task.due_date,
            status: task.status,
            category: task.category,
            is_completed: task.is_completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskMessageResponse {
    pub message: &'static str,
    pub task: TaskResponse,
}

// =============================================================================
// LIST
// =============================================================================

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub todo_count: usize,
}

// =============================================================================
// CALENDAR
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    /// Day of month to that day's tasks.
    pub days: BTreeMap<u32, Vec<TaskResponse>>,
}

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const STATUS_TODO: &str = "todo";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";

/// `status` and `is_completed` are independent columns. Only the completion
/// toggle writes both; a plain edit may leave them disagreeing.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: String,
    pub user_id: String,
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

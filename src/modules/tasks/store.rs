use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::interface::{TaskError, TaskRepository};
use super::model::{Task, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_TODO};
use super::schema::TaskRequest;
use crate::services::clock::Clock;

/// A user's tasks plus the aggregates shown next to them. Counts are derived
/// from `tasks` on every call.
#[derive(Debug)]
pub struct TaskSummary {
    pub tasks: Vec<Task>,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub todo_count: usize,
}

impl TaskSummary {
    fn from_tasks(tasks: Vec<Task>) -> Self {
        let completed_count = tasks.iter().filter(|t| t.is_completed).count();
        let in_progress_count = tasks.iter().filter(|t| t.status == STATUS_IN_PROGRESS).count();
        let todo_count = tasks.iter().filter(|t| t.status == STATUS_TODO).count();
        Self {
            tasks,
            completed_count,
            in_progress_count,
            todo_count,
        }
    }
}

#[derive(Debug)]
pub struct MonthTasks {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<u32, Vec<Task>>,
}

/// Folds an out-of-range month into the neighbouring years: month 13 is
/// January of the next year, month 0 is December of the previous one.
pub fn normalize_month(year: i32, month: i32) -> Result<(i32, u32), TaskError> {
    let months = i64::from(year) * 12 + i64::from(month) - 1;
    let year = i32::try_from(months.div_euclid(12))
        .map_err(|_| TaskError::Validation("Invalid year.".to_string()))?;
    let month = u32::try_from(months.rem_euclid(12) + 1)
        .map_err(|_| TaskError::Validation("Invalid month.".to_string()))?;
    Ok((year, month))
}

/// First and last calendar day of the month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), TaskError> {
    let out_of_range = || TaskError::Validation("Date out of range.".to_string());

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(out_of_range)?;
    Ok((first, last))
}

fn parse_due_date(raw: &str) -> Result<NaiveDate, TaskError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        TaskError::Validation(format!(
            "'{}' is not a valid due date. Use the YYYY-MM-DD format.",
            raw
        ))
    })
}

/// Owner-scoped task operations. A task that belongs to someone else behaves
/// exactly like one that does not exist.
pub struct TaskStore<'a> {
    repo: &'a dyn TaskRepository,
    clock: &'a (dyn Clock + Send + Sync),
}

impl<'a> TaskStore<'a> {
    pub fn new(repo: &'a dyn TaskRepository, clock: &'a (dyn Clock + Send + Sync)) -> Self {
        Self { repo, clock }
    }

    pub async fn create(&self, owner_id: &str, req: &TaskRequest) -> Result<Task, TaskError> {
        let due_date = parse_due_date(&req.due_date)?;
        let now = self.clock.utc();

        let task = Task {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            title: req.title.clone(),
            description: req.description.clone(),
            priority: req.priority.clone(),
            due_date,
            status: req.status.clone(),
            category: req.category.clone(),
            is_completed: req.is_completed,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(&task).await?;

        tracing::info!(task_id = %task.id, owner_id, "Task created");
        Ok(task)
    }

    pub async fn list(&self, owner_id: &str) -> Result<TaskSummary, TaskError> {
        let tasks = self.repo.list_for_owner(owner_id).await?;
        Ok(TaskSummary::from_tasks(tasks))
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> Result<Task, TaskError> {
        self.repo
            .find_for_owner(owner_id, id)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Replaces every mutable field; `status` and `is_completed` are stored as
    /// submitted even when they disagree.
    pub async fn update(&self, owner_id: &str, id: &str, req: &TaskRequest) -> Result<Task, TaskError> {
        let mut task = self.get(owner_id, id).await?;
        let due_date = parse_due_date(&req.due_date)?;

        task.title = req.title.clone();
        task.description = req.description.clone();
        task.priority = req.priority.clone();
        task.due_date = due_date;
        task.status = req.status.clone();
        task.category = req.category.clone();
        task.is_completed = req.is_completed;
        task.updated_at = self.clock.utc();
        self.repo.update(&task).await?;

        tracing::info!(task_id = %task.id, owner_id, "Task updated");
        Ok(task)
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<(), TaskError> {
        if !self.repo.delete_for_owner(owner_id, id).await? {
            return Err(TaskError::NotFound);
        }
        tracing::info!(task_id = id, owner_id, "Task deleted");
        Ok(())
    }

    /// Flips completion and rewrites status to match, discarding whatever
    /// status was there before.
    pub async fn toggle_completion(&self, owner_id: &str, id: &str) -> Result<Task, TaskError> {
        let mut task = self.get(owner_id, id).await?;

        task.is_completed = !task.is_completed;
        task.status = if task.is_completed {
            STATUS_COMPLETED.to_string()
        } else {
            STATUS_TODO.to_string()
        };
        task.updated_at = self.clock.utc();
        self.repo.update(&task).await?;

        tracing::info!(task_id = %task.id, owner_id, completed = task.is_completed, "Task completion toggled");
        Ok(task)
    }

    pub async fn by_month(&self, owner_id: &str, year: i32, month: i32) -> Result<MonthTasks, TaskError> {
        let (year, month) = normalize_month(year, month)?;
        let (first, last) = month_bounds(year, month)?;

        let mut days: BTreeMap<u32, Vec<Task>> = BTreeMap::new();
        for task in self.repo.list_due_between(owner_id, first, last).await? {
            days.entry(task.due_date.day()).or_default().push(task);
        }

        Ok(MonthTasks { year, month, days })
    }
}

//! In-memory task rows for tests and database-less runs.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::sync::{Arc, RwLock};

use super::interface::TaskRepository;
use super::model::Task;
use crate::modules::shared::{StoreError, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest created first; later insertions win ties.
fn newest_first<'a>(tasks: impl DoubleEndedIterator<Item = &'a Task>) -> Vec<Task> {
    let mut listed: Vec<Task> = tasks.rev().cloned().collect();
    listed.sort_by_key(|t| Reverse(t.created_at));
    listed
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> StoreResult<()> {
        let mut tasks = self.tasks.write().map_err(StoreError::poisoned)?;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::Internal(format!("duplicate task id {}", task.id)));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn find_for_owner(&self, owner_id: &str, id: &str) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().map_err(StoreError::poisoned)?;
        Ok(tasks
            .iter()
            .find(|t| t.id == id && t.user_id == owner_id)
            .cloned())
    }

    async fn list_for_owner(&self, owner_id: &str) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(StoreError::poisoned)?;
        Ok(newest_first(tasks.iter().filter(|t| t.user_id == owner_id)))
    }

    async fn list_due_between(&self, owner_id: &str, first: NaiveDate, last: NaiveDate) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(StoreError::poisoned)?;
        let mut due = newest_first(
            tasks
                .iter()
                .filter(|t| t.user_id == owner_id && t.due_date >= first && t.due_date <= last),
        );
        due.sort_by_key(|t| t.due_date);
        Ok(due)
    }

    async fn update(&self, task: &Task) -> StoreResult<()> {
        let mut tasks = self.tasks.write().map_err(StoreError::poisoned)?;
        if let Some(stored) = tasks
            .iter_mut()
            .find(|t| t.id == task.id && t.user_id == task.user_id)
        {
            *stored = Task {
                created_at: stored.created_at,
                ..task.clone()
            };
        }
        Ok(())
    }

    async fn delete_for_owner(&self, owner_id: &str, id: &str) -> StoreResult<bool> {
        let mut tasks = self.tasks.write().map_err(StoreError::poisoned)?;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.user_id == owner_id));
        Ok(tasks.len() < before)
    }

    async fn delete_all_for_owner(&self, owner_id: &str) -> StoreResult<u64> {
        let mut tasks = self.tasks.write().map_err(StoreError::poisoned)?;
        let before = tasks.len();
        tasks.retain(|t| t.user_id != owner_id);
        Ok((before - tasks.len()) as u64)
    }

    async fn count_all(&self) -> StoreResult<i64> {
        let tasks = self.tasks.read().map_err(StoreError::poisoned)?;
        Ok(tasks.len() as i64)
    }
}

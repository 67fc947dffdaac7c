use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{MySql, Pool};

use super::interface::TaskRepository;
use super::model::Task;
use crate::modules::shared::StoreResult;

pub struct TaskCrud {
    pool: Pool<MySql>,
}

impl TaskCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for TaskCrud {
    async fn insert(&self, task: &Task) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, user_id, title, description, priority, due_date, status, category, is_completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.priority)
        .bind(task.due_date)
        .bind(&task.status)
        .bind(&task.category)
        .bind(task.is_completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_for_owner(&self, owner_id: &str, id: &str) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_for_owner(&self, owner_id: &str) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE user_id = ? ORDER BY created_at DESC")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn list_due_between(&self, owner_id: &str, first: NaiveDate, last: NaiveDate) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE user_id = ? AND due_date BETWEEN ? AND ?
            ORDER BY due_date ASC, created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(first)
        .bind(last)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, priority = ?, due_date = ?, status = ?, category = ?, is_completed = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.priority)
        .bind(task.due_date)
        .bind(&task.status)
        .bind(&task.category)
        .bind(task.is_completed)
        .bind(task.updated_at)
        .bind(&task.id)
        .bind(&task.user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_for_owner(&self, owner_id: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_owner(&self, owner_id: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = ?")
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_all(&self) -> StoreResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}

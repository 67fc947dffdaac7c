use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::{PasswordResetCodeRepository, UserRepository};
use super::model::{PasswordResetCode, User};
use crate::modules::shared::StoreResult;

// =============================================================================
// USER CRUD
// =============================================================================

pub struct UserCrud {
    pool: Pool<MySql>,
}

impl UserCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for UserCrud {
    async fn create(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, first_name, last_name, is_staff, is_superuser, is_active, date_joined)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.is_active)
        .bind(user.date_joined)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<&str>) -> StoreResult<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ? AND id <> ?")
            .bind(username)
            .bind(exclude_id.unwrap_or(""))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<&str>) -> StoreResult<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ? AND id <> ?")
            .bind(email)
            .bind(exclude_id.unwrap_or(""))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    async fn list_newest_first(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY date_joined DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_profile(&self, user: &User) -> StoreResult<()> {
        sqlx::query("UPDATE users SET username = ?, email = ?, first_name = ?, last_name = ? WHERE id = ?")
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> StoreResult<()> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        // tasks and password_reset_codes cascade
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// RESET CODE CRUD
// =============================================================================

pub struct ResetCodeCrud {
    pool: Pool<MySql>,
}

impl ResetCodeCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetCodeRepository for ResetCodeCrud {
    async fn upsert(&self, code: &PasswordResetCode) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_codes (user_id, code, created_at, is_used)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE code = VALUES(code), created_at = VALUES(created_at), is_used = VALUES(is_used)
            "#,
        )
        .bind(&code.user_id)
        .bind(&code.code)
        .bind(code.created_at)
        .bind(code.is_used)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<PasswordResetCode>> {
        let code = sqlx::query_as::<_, PasswordResetCode>(
            "SELECT user_id, code, created_at, is_used FROM password_reset_codes WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(code)
    }

    async fn mark_used(&self, user_id: &str) -> StoreResult<()> {
        sqlx::query("UPDATE password_reset_codes SET is_used = TRUE WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM password_reset_codes WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

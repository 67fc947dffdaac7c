//! In-memory identity storage for tests and database-less runs.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::interface::{PasswordResetCodeRepository, UserRepository};
use super::model::{PasswordResetCode, User};
use crate::modules::shared::{StoreError, StoreResult};

/// Users kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_other(user: &User, exclude_id: Option<&str>) -> bool {
    exclude_id.map_or(true, |id| user.id != id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().map_err(StoreError::poisoned)?;
        if users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Internal(format!(
                "duplicate user '{}'",
                user.username
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(StoreError::poisoned)?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(StoreError::poisoned)?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(StoreError::poisoned)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<&str>) -> StoreResult<bool> {
        let users = self.users.read().map_err(StoreError::poisoned)?;
        Ok(users
            .iter()
            .any(|u| u.username == username && is_other(u, exclude_id)))
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<&str>) -> StoreResult<bool> {
        let users = self.users.read().map_err(StoreError::poisoned)?;
        Ok(users
            .iter()
            .any(|u| u.email == email && is_other(u, exclude_id)))
    }

    async fn list_newest_first(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().map_err(StoreError::poisoned)?;
        // later insertions win ties on date_joined
        let mut listed: Vec<User> = users.iter().rev().cloned().collect();
        listed.sort_by_key(|u| Reverse(u.date_joined));
        Ok(listed)
    }

    async fn update_profile(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().map_err(StoreError::poisoned)?;
        if let Some(stored) = users.iter_mut().find(|u| u.id == user.id) {
            stored.username = user.username.clone();
            stored.email = user.email.clone();
            stored.first_name = user.first_name.clone();
            stored.last_name = user.last_name.clone();
        }
        Ok(())
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> StoreResult<()> {
        let mut users = self.users.write().map_err(StoreError::poisoned)?;
        if let Some(stored) = users.iter_mut().find(|u| u.id == user_id) {
            stored.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut users = self.users.write().map_err(StoreError::poisoned)?;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

/// Reset codes keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResetCodeRepository {
    codes: Arc<RwLock<HashMap<String, PasswordResetCode>>>,
}

impl InMemoryResetCodeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.codes.read().map(|codes| codes.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PasswordResetCodeRepository for InMemoryResetCodeRepository {
    async fn upsert(&self, code: &PasswordResetCode) -> StoreResult<()> {
        let mut codes = self.codes.write().map_err(StoreError::poisoned)?;
        codes.insert(code.user_id.clone(), code.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<PasswordResetCode>> {
        let codes = self.codes.read().map_err(StoreError::poisoned)?;
        Ok(codes.get(user_id).cloned())
    }

    async fn mark_used(&self, user_id: &str) -> StoreResult<()> {
        let mut codes = self.codes.write().map_err(StoreError::poisoned)?;
        if let Some(code) = codes.get_mut(user_id) {
            code.is_used = true;
        }
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &str) -> StoreResult<()> {
        let mut codes = self.codes.write().map_err(StoreError::poisoned)?;
        codes.remove(user_id);
        Ok(())
    }
}

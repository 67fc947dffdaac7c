use uuid::Uuid;
use validator::Validate;

use super::interface::{require_admin, AdminError};
use super::schema::{AdminPasswordRequest, CreateUserRequest, EditUserRequest};
use crate::config::AdminBootstrap;
use crate::modules::auth::interface::{PasswordResetCodeRepository, UserRepository};
use crate::modules::auth::model::User;
use crate::modules::tasks::interface::TaskRepository;
use crate::modules::tasks::model::Task;
use crate::services::clock::Clock;
use crate::services::hashing;

pub struct Dashboard {
    pub users: Vec<User>,
    pub total_users: usize,
    pub active_users: usize,
    pub admin_count: usize,
    pub total_tasks: i64,
}

/// Privileged user management. Every operation checks the caller first.
pub struct AdminService<'a> {
    users: &'a dyn UserRepository,
    reset_codes: &'a dyn PasswordResetCodeRepository,
    tasks: &'a dyn TaskRepository,
    clock: &'a (dyn Clock + Send + Sync),
}

impl<'a> AdminService<'a> {
    pub fn new(
        users: &'a dyn UserRepository,
        reset_codes: &'a dyn PasswordResetCodeRepository,
        tasks: &'a dyn TaskRepository,
        clock: &'a (dyn Clock + Send + Sync),
    ) -> Self {
        Self {
            users,
            reset_codes,
            tasks,
            clock,
        }
    }

    pub async fn dashboard(&self, caller: &User) -> Result<Dashboard, AdminError> {
        require_admin(caller)?;

        let users = self.users.list_newest_first().await?;
        let total_tasks = self.tasks.count_all().await?;

        Ok(Dashboard {
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.is_active).count(),
            admin_count: users.iter().filter(|u| u.is_staff).count(),
            total_tasks,
            users,
        })
    }

    pub async fn create_user(&self, caller: &User, req: &CreateUserRequest) -> Result<User, AdminError> {
        require_admin(caller)?;
        req.validate()
            .map_err(|e| AdminError::Validation(e.to_string()))?;

        if self.users.username_taken(&req.username, None).await? {
            return Err(AdminError::Conflict(format!("Username '{}' already exists.", req.username)));
        }
        if self.users.email_taken(&req.email, None).await? {
            return Err(AdminError::Conflict(format!("Email '{}' is already registered.", req.email)));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: req.username.clone(),
            email: req.email.clone(),
            password_hash: hashing::hash_password(&req.password)?,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            is_staff: req.is_staff,
            is_superuser: false,
            is_active: true,
            date_joined: self.clock.utc(),
        };
        self.users.create(&user).await?;

        tracing::info!(admin_id = %caller.id, user_id = %user.id, "Admin created user");
        Ok(user)
    }

    /// Uniqueness is checked against every row except the one being edited.
    pub async fn edit_user(&self, caller: &User, id: &str, req: &EditUserRequest) -> Result<User, AdminError> {
        require_admin(caller)?;
        let mut user = self.target(id).await?;
        req.validate()
            .map_err(|e| AdminError::Validation(e.to_string()))?;

        if self.users.username_taken(&req.username, Some(id)).await? {
            return Err(AdminError::Conflict(format!("Username '{}' is already taken.", req.username)));
        }
        if self.users.email_taken(&req.email, Some(id)).await? {
            return Err(AdminError::Conflict(format!("Email '{}' is already registered.", req.email)));
        }

        user.username = req.username.clone();
        user.email = req.email.clone();
        user.first_name = req.first_name.clone();
        user.last_name = req.last_name.clone();
        self.users.update_profile(&user).await?;

        tracing::info!(admin_id = %caller.id, user_id = %user.id, "Admin updated user");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        caller: &User,
        id: &str,
        req: &AdminPasswordRequest,
    ) -> Result<User, AdminError> {
        require_admin(caller)?;
        let user = self.target(id).await?;

        hashing::check_new_password(&req.new_password, &req.confirm_password)
            .map_err(|e| AdminError::Validation(e.to_string()))?;

        let password_hash = hashing::hash_password(&req.new_password)?;
        self.users.update_password(&user.id, &password_hash).await?;

        tracing::info!(admin_id = %caller.id, user_id = %user.id, "Admin changed user password");
        Ok(user)
    }

    /// Removes the account together with its tasks and reset code.
    pub async fn delete_user(&self, caller: &User, id: &str) -> Result<User, AdminError> {
        require_admin(caller)?;
        if caller.id == id {
            return Err(AdminError::CannotDeleteSelf);
        }
        let user = self.target(id).await?;

        self.tasks.delete_all_for_owner(&user.id).await?;
        self.reset_codes.delete_for_user(&user.id).await?;
        if !self.users.delete(&user.id).await? {
            return Err(AdminError::UserNotFound);
        }

        tracing::info!(admin_id = %caller.id, user_id = %user.id, "Admin deleted user");
        Ok(user)
    }

    /// Read-only view of another user's tasks, newest first.
    pub async fn tasks_for(&self, caller: &User, id: &str) -> Result<(User, Vec<Task>), AdminError> {
        require_admin(caller)?;
        let user = self.target(id).await?;
        let tasks = self.tasks.list_for_owner(&user.id).await?;
        Ok((user, tasks))
    }

    async fn target(&self, id: &str) -> Result<User, AdminError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AdminError::UserNotFound)
    }
}

/// Creates the configured superuser unless that username already exists.
/// Returns whether an account was created.
pub async fn ensure_bootstrap_admin(
    users: &dyn UserRepository,
    bootstrap: &AdminBootstrap,
    clock: &(dyn Clock + Send + Sync),
) -> Result<bool, AdminError> {
    if users.find_by_username(&bootstrap.username).await?.is_some() {
        return Ok(false);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: bootstrap.username.clone(),
        email: bootstrap.email.clone(),
        password_hash: hashing::hash_password(&bootstrap.password)?,
        first_name: String::new(),
        last_name: String::new(),
        is_staff: true,
        is_superuser: true,
        is_active: true,
        date_joined: clock.utc(),
    };
    users.create(&user).await?;

    tracing::info!(username = %user.username, "Bootstrap admin account created");
    Ok(true)
}

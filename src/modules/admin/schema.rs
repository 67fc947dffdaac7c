use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::auth::schema::UserResponse;
use crate::modules::tasks::schema::TaskResponse;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub users: Vec<UserResponse>,
    pub total_users: usize,
    pub active_users: usize,
    pub admin_count: usize,
    pub total_tasks: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "Username is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "Username is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminPasswordRequest {
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserTasksResponse {
    pub user: UserResponse,
    pub tasks: Vec<TaskResponse>,
}

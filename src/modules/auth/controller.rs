use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::modules::auth::{
    interface::AuthError,
    model::User,
    schema::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse},
};
use crate::modules::shared::MessageResponse;
use crate::services::clock::Clock;
use crate::services::hashing;
use crate::services::password_reset::{PasswordResetFlow, ResetError, ResetOutcome, ResetSubmission};
use crate::AppState;

// =============================================================================
// POST /auth/register
// =============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    if req.password1 != req.password2 {
        return Err(AuthError::Validation("Passwords do not match.".to_string()));
    }

    if state.users.username_taken(&req.username, None).await? {
        return Err(AuthError::UsernameTaken);
    }

    if state.users.email_taken(&req.email, None).await? {
        return Err(AuthError::EmailTaken);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: req.username,
        email: req.email,
        password_hash: hashing::hash_password(&req.password1)?,
        first_name: req.first_name,
        last_name: req.last_name,
        is_staff: false,
        is_superuser: false,
        is_active: true,
        date_joined: state.clock.utc(),
    };
    state.users.create(&user).await?;

    state.metrics.record_auth_event("register", true);
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful. You can now log in.",
            user: user.into(),
        }),
    ))
}

// =============================================================================
// POST /auth/login
// =============================================================================

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let user = match state.users.find_by_username(&req.username).await? {
        Some(user) if user.is_active && hashing::verify_password(&req.password, &user.password_hash)? => user,
        _ => {
            state.metrics.record_auth_event("login", false);
            tracing::warn!(username = %req.username, "Rejected login attempt");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let access_token = state
        .jwt_service
        .create_access_token(&user.id, &user.username)
        .map_err(|e| AuthError::Token(e.to_string()))?;

    state.metrics.record_auth_event("login", true);
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful.",
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.access_token_duration_secs(),
    }))
}

// =============================================================================
// GET|POST /auth/logout
// =============================================================================

/// Tokens are stateless; the client discards its bearer token.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("You have been logged out."))
}

// =============================================================================
// GET /auth/profile
// =============================================================================

pub async fn profile(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}

// =============================================================================
// POST /auth/change-password
// =============================================================================

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    if !hashing::verify_password(&req.old_password, &user.password_hash)? {
        return Err(AuthError::Validation(
            "Your old password was entered incorrectly. Please enter it again.".to_string(),
        ));
    }

    hashing::check_new_password(&req.new_password, &req.confirm_password)
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let password_hash = hashing::hash_password(&req.new_password)?;
    state.users.update_password(&user.id, &password_hash).await?;

    state.metrics.record_auth_event("change_password", true);
    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(MessageResponse::new("Your password was successfully updated.")))
}

// =============================================================================
// POST /auth/forgot-password
// =============================================================================

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ResetSubmission>,
) -> Result<Json<ResetOutcome>, ResetError> {
    let flow = PasswordResetFlow::new(
        state.users.as_ref(),
        state.reset_codes.as_ref(),
        state.mailer.as_ref(),
        state.clock.as_ref(),
        &state.mail_from,
    );

    let step = submission.step_name();
    let result = flow.handle(submission).await;
    state.metrics.record_reset(step, result.is_ok());

    result.map(Json)
}

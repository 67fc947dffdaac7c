use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::interface::AuthError;
use crate::AppState;

/// Resolves the bearer token to an active `User` and stores it in the request
/// extensions for the handler.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::Unauthorized)?;

    let claims = state
        .jwt_service
        .verify_access_token(token)
        .map_err(|_| AuthError::Unauthorized)?
        .claims;

    let user = state
        .users
        .find_by_id(&claims.sub)
        .await?
        .filter(|user| user.is_active)
        .ok_or(AuthError::Unauthorized)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

//! User account handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::db::{NewUser, UserRepository};
use crate::web::dto::{CredentialsRequest, UserResponse};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

fn require_credentials(req: &CredentialsRequest) -> Result<(), ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }
    Ok(())
}

/// POST /api/users - Create an account.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_credentials(&req)?;

    let hashed_password = state.hash_password(req.password).await?;
    let user = UserRepository::new(state.db.pool())
        .create(&NewUser::new(req.email, hashed_password))
        .await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users - Change the caller's email and password.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_credentials(&req)?;

    let hashed_password = state.hash_password(req.password).await?;
    let user = UserRepository::new(state.db.pool())
        .update_credentials(user_id, &req.email, &hashed_password)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(%user_id, "User credentials updated");

    Ok(Json(user.into()))
}

//! Session token authentication extractor.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{bearer_from_headers, verify_session_token};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Extractor for authenticated users.
///
/// Use this extractor to require a valid session token for a handler.
/// The handler receives the ID of the user the token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_from_headers(&parts.headers).map_err(|e| {
            tracing::debug!("Missing session credential: {}", e);
            ApiError::from(e)
        })?;

        let user_id = verify_session_token(&token, &state.jwt_secret).map_err(|e| {
            tracing::debug!("Session token rejected: {}", e);
            ApiError::from(e)
        })?;

        Ok(AuthUser(user_id))
    }
}

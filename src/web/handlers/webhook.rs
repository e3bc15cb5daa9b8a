//! Payment provider webhooks.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use std::sync::Arc;

use crate::auth::api_key_from_headers;
use crate::db::UserRepository;
use crate::web::dto::PolkaWebhookRequest;
use crate::web::error::ApiError;

use super::AppState;

/// Event that grants Chirpy Red.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// POST /api/polka/webhooks - Membership events from Polka.
///
/// Unknown events are acknowledged and ignored.
pub async fn polka_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<PolkaWebhookRequest>,
) -> Result<StatusCode, ApiError> {
    let key = api_key_from_headers(&headers)?;
    if state.polka_key.is_empty() || key != state.polka_key {
        return Err(ApiError::unauthorized("Invalid API key"));
    }

    if req.event != USER_UPGRADED_EVENT {
        return Ok(StatusCode::NO_CONTENT);
    }

    let upgraded = UserRepository::new(state.db.pool())
        .upgrade_to_chirpy_red(req.data.user_id)
        .await?;
    if !upgraded {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %req.data.user_id, "User upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}

//! Chirp handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{ChirpRepository, NewChirp, SortOrder};
use crate::profanity::{censor, BANNED_WORDS};
use crate::web::dto::{ChirpListQuery, ChirpResponse, CreateChirpRequest};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

/// Maximum chirp length in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {}", what)))
}

/// POST /api/chirps - Post a chirp.
pub async fn create_chirp(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateChirpRequest>,
) -> Result<(StatusCode, Json<ChirpResponse>), ApiError> {
    if req.body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ApiError::bad_request("Chirp is too long"));
    }

    let cleaned = censor(&req.body, BANNED_WORDS);
    if cleaned.was_censored {
        tracing::debug!(%user_id, "Chirp censored");
    }

    let chirp = ChirpRepository::new(state.db.pool())
        .create(&NewChirp {
            body: cleaned.text,
            user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(chirp.into())))
}

/// GET /api/chirps - List chirps.
pub async fn list_chirps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChirpListQuery>,
) -> Result<Json<Vec<ChirpResponse>>, ApiError> {
    let author = match query.author_id.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_id(raw, "author ID")?),
        _ => None,
    };
    let order = SortOrder::parse(query.sort.as_deref());

    let chirps = ChirpRepository::new(state.db.pool())
        .list(author, order)
        .await?;

    Ok(Json(chirps.into_iter().map(Into::into).collect()))
}

/// GET /api/chirps/:chirp_id - Get one chirp.
pub async fn get_chirp(
    State(state): State<Arc<AppState>>,
    Path(chirp_id): Path<String>,
) -> Result<Json<ChirpResponse>, ApiError> {
    let chirp_id = parse_id(&chirp_id, "chirp ID")?;

    let chirp = ChirpRepository::new(state.db.pool())
        .get_by_id(chirp_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    Ok(Json(chirp.into()))
}

/// DELETE /api/chirps/:chirp_id - Delete one of the caller's chirps.
pub async fn delete_chirp(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(chirp_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let chirp_id = parse_id(&chirp_id, "chirp ID")?;
    let repo = ChirpRepository::new(state.db.pool());

    let chirp = repo
        .get_by_id(chirp_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    if chirp.user_id != user_id {
        return Err(ApiError::forbidden("You can only delete your own chirps"));
    }

    repo.delete(chirp_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Authentication handlers.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use chrono::Duration;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::auth::{bearer_from_headers, issue_session_token, PasswordHasher, RefreshTokenManager};
use crate::config::{AuthConfig, WebConfig};
use crate::db::{RefreshTokenRepository, UserRepository};
use crate::web::dto::{CredentialsRequest, LoginResponse, TokenResponse};
use crate::web::error::ApiError;
use crate::{ChirpyError, Database};

const DUMMY_PASSWORD: &str = "chirpy-unknown-account";

/// Application state shared across handlers.
pub struct AppState {
    /// Database pool.
    pub db: Database,
    /// Secret that signs session tokens.
    pub jwt_secret: Vec<u8>,
    /// Session token lifetime.
    pub session_token_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_token_ttl: Duration,
    /// Key the payment provider presents on webhook calls.
    pub polka_key: String,
    /// Whether destructive admin endpoints are enabled.
    pub is_dev: bool,
    /// Password hasher with the configured work factor.
    pub hasher: PasswordHasher,
    /// Hash checked against when a login names an unknown email.
    pub dummy_password_hash: String,
    /// Requests served under `/app` and `/api`.
    pub file_server_hits: AtomicU64,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Fails if a token lifetime is out of range or the Argon2 parameters
    /// are rejected.
    pub fn new(db: Database, auth: &AuthConfig, web: &WebConfig) -> crate::Result<Self> {
        let hasher =
            PasswordHasher::new(&auth.password).map_err(|e| ChirpyError::Config(e.to_string()))?;
        let dummy_password_hash = hasher
            .hash(DUMMY_PASSWORD)
            .map_err(|e| ChirpyError::Config(e.to_string()))?;

        Ok(Self {
            db,
            jwt_secret: auth.jwt_secret.as_bytes().to_vec(),
            session_token_ttl: auth.session_token_ttl()?,
            refresh_token_ttl: auth.refresh_token_ttl()?,
            polka_key: auth.polka_key.clone(),
            is_dev: web.is_dev(),
            hasher,
            dummy_password_hash,
            file_server_hits: AtomicU64::new(0),
        })
    }

    /// Refresh token manager backed by this state's database.
    pub fn refresh_tokens(&self) -> RefreshTokenManager<RefreshTokenRepository<'_>> {
        RefreshTokenManager::new(RefreshTokenRepository::new(self.db.pool()))
    }

    /// Hash a password off the async runtime.
    pub async fn hash_password(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {}", e);
                ApiError::internal("An internal error occurred")
            })??;
        Ok(hash)
    }

    /// Verify a password off the async runtime.
    pub async fn verify_password(
        &self,
        password: String,
        hash: String,
    ) -> Result<(), ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {}", e);
                ApiError::internal("An internal error occurred")
            })??;
        Ok(())
    }
}

/// POST /api/login - User login.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_email(&req.email)
        .await?;

    // Unknown emails cost one Argon2 verification, same as a wrong password
    let Some(user) = user else {
        let _ = state
            .verify_password(req.password, state.dummy_password_hash.clone())
            .await;
        return Err(ApiError::unauthorized("Incorrect email or password"));
    };

    state
        .verify_password(req.password, user.hashed_password.clone())
        .await?;

    let token = issue_session_token(user.id, &state.jwt_secret, state.session_token_ttl)?;
    let refresh_token = state
        .refresh_tokens()
        .issue(user.id, state.refresh_token_ttl)
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: user.into(),
        token,
        refresh_token,
    }))
}

/// POST /api/refresh - Exchange a refresh token for a new session token.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let refresh_token = bearer_from_headers(&headers)?;

    let session = state
        .refresh_tokens()
        .refresh(&refresh_token, &state.jwt_secret, state.session_token_ttl)
        .await?;

    Ok(Json(TokenResponse {
        token: session.token,
    }))
}

/// POST /api/revoke - Revoke a refresh token.
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let refresh_token = bearer_from_headers(&headers)?;
    state.refresh_tokens().revoke(&refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

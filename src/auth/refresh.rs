//! Refresh token lifecycle.
//!
//! Refresh tokens are opaque random strings persisted with an expiry and an
//! optional revocation time. A token is `Active` until it either expires or
//! is revoked; both end states are terminal and look the same to callers.
//! Tokens are reused until then, a refresh does not replace them.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::token::{issue_session_token, TokenError};
use crate::ChirpyError;

/// Number of random bytes in a refresh token (hex-encoded to twice as many chars).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Refresh token errors.
#[derive(Error, Debug)]
pub enum RefreshTokenError {
    /// The OS random source failed.
    #[error("failed to generate refresh token: {0}")]
    Entropy(String),

    /// No stored token with this value.
    #[error("refresh token not found")]
    NotFound,

    /// Token is unknown, expired or revoked.
    #[error("invalid refresh token")]
    Invalid,

    /// The token store failed.
    #[error("refresh token storage error: {0}")]
    Storage(String),

    /// Minting the new session token failed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<ChirpyError> for RefreshTokenError {
    fn from(err: ChirpyError) -> Self {
        RefreshTokenError::Storage(err.to_string())
    }
}

/// Stored state of a refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenState {
    /// Owner of the token.
    pub user_id: Uuid,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
    /// Revocation timestamp (None if not revoked).
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenState {
    /// Whether the token can be exchanged at `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        is_usable(self.expires_at, self.revoked_at, now)
    }
}

/// A token is usable iff it is not revoked and `now` is strictly before expiry.
pub fn is_usable(
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    revoked_at.is_none() && now < expires_at
}

/// Persistence operations the refresh token manager needs.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert a new token. Fails if the token value already exists.
    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> crate::Result<()>;

    /// Look a token up without modifying it.
    async fn lookup_refresh_token(&self, token: &str) -> crate::Result<Option<RefreshTokenState>>;

    /// Set `revoked_at` unless already set. Returns false if the token does not exist.
    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> crate::Result<bool>;
}

/// Session token minted by a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshedSession {
    /// User the refresh token belongs to.
    pub user_id: Uuid,
    /// Newly issued session token.
    pub token: String,
}

/// Issues, resolves and revokes refresh tokens against a store.
pub struct RefreshTokenManager<S> {
    store: S,
}

impl<S: RefreshTokenStore> RefreshTokenManager<S> {
    /// Create a manager over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Generate a new opaque token: 32 random bytes, lowercase hex.
    pub fn generate() -> Result<String, RefreshTokenError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| RefreshTokenError::Entropy(e.to_string()))?;
        Ok(hex::encode(bytes))
    }

    /// Store `token` for `user_id`, expiring `ttl` from now.
    pub async fn persist(
        &self,
        token: &str,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<(), RefreshTokenError> {
        let expires_at = Utc::now().checked_add_signed(ttl).ok_or_else(|| {
            RefreshTokenError::Storage("refresh token expiry is out of range".to_string())
        })?;
        self.store
            .insert_refresh_token(token, user_id, expires_at)
            .await?;
        Ok(())
    }

    /// Generate and persist a token for `user_id` in one step.
    pub async fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, RefreshTokenError> {
        let token = Self::generate()?;
        self.persist(&token, user_id, ttl).await?;
        debug!(%user_id, "Issued refresh token");
        Ok(token)
    }

    /// Look up the stored state of a token.
    pub async fn resolve(&self, token: &str) -> Result<RefreshTokenState, RefreshTokenError> {
        self.store
            .lookup_refresh_token(token)
            .await?
            .ok_or(RefreshTokenError::NotFound)
    }

    /// Revoke a token. Revoking an already revoked token succeeds.
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        let found = self
            .store
            .mark_refresh_token_revoked(token, Utc::now())
            .await?;
        if !found {
            return Err(RefreshTokenError::NotFound);
        }
        info!("Revoked refresh token");
        Ok(())
    }

    /// Exchange a refresh token for a new session token.
    ///
    /// Unknown, expired and revoked tokens all fail with
    /// [`RefreshTokenError::Invalid`].
    pub async fn refresh(
        &self,
        token: &str,
        secret: &[u8],
        session_ttl: Duration,
    ) -> Result<RefreshedSession, RefreshTokenError> {
        let state = match self.resolve(token).await {
            Ok(state) => state,
            Err(RefreshTokenError::NotFound) => {
                debug!("Refresh rejected: unknown token");
                return Err(RefreshTokenError::Invalid);
            }
            Err(e) => return Err(e),
        };

        if !state.is_usable_at(Utc::now()) {
            debug!(user_id = %state.user_id, "Refresh rejected: token expired or revoked");
            return Err(RefreshTokenError::Invalid);
        }

        let token = issue_session_token(state.user_id, secret, session_ttl)?;
        Ok(RefreshedSession {
            user_id: state.user_id,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_session_token;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store for exercising the manager without a database.
    #[derive(Default)]
    struct MemoryStore {
        tokens: Mutex<HashMap<String, RefreshTokenState>>,
    }

    #[async_trait]
    impl RefreshTokenStore for MemoryStore {
        async fn insert_refresh_token(
            &self,
            token: &str,
            user_id: Uuid,
            expires_at: DateTime<Utc>,
        ) -> crate::Result<()> {
            let mut tokens = self.tokens.lock().unwrap();
            if tokens.contains_key(token) {
                return Err(ChirpyError::Conflict("refresh token".to_string()));
            }
            tokens.insert(
                token.to_string(),
                RefreshTokenState {
                    user_id,
                    expires_at,
                    revoked_at: None,
                },
            );
            Ok(())
        }

        async fn lookup_refresh_token(
            &self,
            token: &str,
        ) -> crate::Result<Option<RefreshTokenState>> {
            Ok(self.tokens.lock().unwrap().get(token).cloned())
        }

        async fn mark_refresh_token_revoked(
            &self,
            token: &str,
            revoked_at: DateTime<Utc>,
        ) -> crate::Result<bool> {
            let mut tokens = self.tokens.lock().unwrap();
            match tokens.get_mut(token) {
                Some(state) => {
                    state.revoked_at.get_or_insert(revoked_at);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    /// Store whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl RefreshTokenStore for BrokenStore {
        async fn insert_refresh_token(
            &self,
            _token: &str,
            _user_id: Uuid,
            _expires_at: DateTime<Utc>,
        ) -> crate::Result<()> {
            Err(ChirpyError::Database("disk I/O error".to_string()))
        }

        async fn lookup_refresh_token(
            &self,
            _token: &str,
        ) -> crate::Result<Option<RefreshTokenState>> {
            Err(ChirpyError::Database("disk I/O error".to_string()))
        }

        async fn mark_refresh_token_revoked(
            &self,
            _token: &str,
            _revoked_at: DateTime<Utc>,
        ) -> crate::Result<bool> {
            Err(ChirpyError::Database("disk I/O error".to_string()))
        }
    }

    const SECRET: &[u8] = b"refresh-test-secret";

    fn manager() -> RefreshTokenManager<MemoryStore> {
        RefreshTokenManager::new(MemoryStore::default())
    }

    #[test]
    fn test_generate_format() {
        let token = RefreshTokenManager::<MemoryStore>::generate().unwrap();
        assert_eq!(token.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_generate_unique() {
        let a = RefreshTokenManager::<MemoryStore>::generate().unwrap();
        let b = RefreshTokenManager::<MemoryStore>::generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_usable() {
        let now = Utc::now();
        let later = now + Duration::days(60);

        assert!(is_usable(later, None, now));
        // Strictly before expiry
        assert!(!is_usable(now, None, now));
        assert!(!is_usable(now - Duration::seconds(1), None, now));
        // Revoked tokens are never usable
        assert!(!is_usable(later, Some(now), now));
    }

    #[tokio::test]
    async fn test_persist_and_resolve() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let token = RefreshTokenManager::<MemoryStore>::generate().unwrap();

        manager
            .persist(&token, user_id, Duration::days(60))
            .await
            .unwrap();

        let state = manager.resolve(&token).await.unwrap();
        assert_eq!(state.user_id, user_id);
        assert!(state.revoked_at.is_none());
        assert!(state.is_usable_at(Utc::now()));
        assert!(state.is_usable_at(Utc::now() + Duration::days(59)));
        assert!(!state.is_usable_at(Utc::now() + Duration::days(61)));
    }

    #[tokio::test]
    async fn test_persist_duplicate_is_storage_error() {
        let manager = manager();
        let user_id = Uuid::new_v4();

        manager
            .persist("dup", user_id, Duration::days(1))
            .await
            .unwrap();
        let result = manager.persist("dup", user_id, Duration::days(1)).await;
        assert!(matches!(result, Err(RefreshTokenError::Storage(_))));
    }

    #[tokio::test]
    async fn test_persist_ttl_overflow() {
        let manager = manager();

        let result = manager
            .persist("far-future", Uuid::new_v4(), Duration::days(100_000_000))
            .await;
        assert!(matches!(result, Err(RefreshTokenError::Storage(_))));
        assert!(matches!(
            manager.resolve("far-future").await,
            Err(RefreshTokenError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_resolve_unknown() {
        let result = manager().resolve("nonexistent").await;
        assert!(matches!(result, Err(RefreshTokenError::NotFound)));
    }

    #[tokio::test]
    async fn test_revoke() {
        let manager = manager();
        let token = manager
            .issue(Uuid::new_v4(), Duration::days(60))
            .await
            .unwrap();

        manager.revoke(&token).await.unwrap();

        let state = manager.resolve(&token).await.unwrap();
        assert!(state.revoked_at.is_some());
        assert!(!state.is_usable_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_revoke_twice_keeps_first_time() {
        let manager = manager();
        let token = manager
            .issue(Uuid::new_v4(), Duration::days(60))
            .await
            .unwrap();

        manager.revoke(&token).await.unwrap();
        let first = manager.resolve(&token).await.unwrap().revoked_at;

        manager.revoke(&token).await.unwrap();
        let second = manager.resolve(&token).await.unwrap().revoked_at;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_revoke_unknown() {
        let result = manager().revoke("nonexistent").await;
        assert!(matches!(result, Err(RefreshTokenError::NotFound)));
    }

    #[tokio::test]
    async fn test_refresh_issues_session_token() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let token = manager.issue(user_id, Duration::days(60)).await.unwrap();

        let session = manager
            .refresh(&token, SECRET, Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(session.user_id, user_id);
        assert_eq!(verify_session_token(&session.token, SECRET).unwrap(), user_id);

        // Not rotated: the same refresh token works again
        let again = manager
            .refresh(&token, SECRET, Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(again.user_id, user_id);
    }

    #[tokio::test]
    async fn test_refresh_failures_are_uniform() {
        let manager = manager();
        let user_id = Uuid::new_v4();

        let expired = manager.issue(user_id, Duration::seconds(-1)).await.unwrap();
        let revoked = manager.issue(user_id, Duration::days(60)).await.unwrap();
        manager.revoke(&revoked).await.unwrap();

        for token in [expired.as_str(), revoked.as_str(), "unknown"] {
            let result = manager.refresh(token, SECRET, Duration::hours(1)).await;
            assert!(matches!(result, Err(RefreshTokenError::Invalid)));
        }
    }

    #[tokio::test]
    async fn test_revoking_one_session_leaves_others() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let laptop = manager.issue(user_id, Duration::days(60)).await.unwrap();
        let phone = manager.issue(user_id, Duration::days(60)).await.unwrap();

        manager.revoke(&laptop).await.unwrap();

        assert!(manager.refresh(&laptop, SECRET, Duration::hours(1)).await.is_err());
        assert!(manager.refresh(&phone, SECRET, Duration::hours(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_storage_failures_surface() {
        let manager = RefreshTokenManager::new(BrokenStore);

        assert!(matches!(
            manager.persist("t", Uuid::new_v4(), Duration::days(1)).await,
            Err(RefreshTokenError::Storage(_))
        ));
        assert!(matches!(
            manager.resolve("t").await,
            Err(RefreshTokenError::Storage(_))
        ));
        assert!(matches!(
            manager.revoke("t").await,
            Err(RefreshTokenError::Storage(_))
        ));
        // Not masked as Invalid
        assert!(matches!(
            manager.refresh("t", SECRET, Duration::hours(1)).await,
            Err(RefreshTokenError::Storage(_))
        ));
    }
}

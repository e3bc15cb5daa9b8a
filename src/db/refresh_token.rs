//! Refresh token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::{RefreshTokenState, RefreshTokenStore};
use crate::{ChirpyError, Result};

/// Refresh token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    /// Token string.
    pub token: String,
    /// User ID.
    pub user_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
    /// Revocation timestamp (None if not revoked).
    pub revoked_at: Option<DateTime<Utc>>,
}

impl From<RefreshToken> for RefreshTokenState {
    fn from(row: RefreshToken) -> Self {
        RefreshTokenState {
            user_id: row.user_id,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
        }
    }
}

/// New refresh token for creation.
pub struct NewRefreshToken {
    /// Token string.
    pub token: String,
    /// User ID.
    pub user_id: Uuid,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Repository for refresh token operations.
#[derive(Clone)]
pub struct RefreshTokenRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RefreshTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new refresh token.
    pub async fn create(&self, new_token: &NewRefreshToken) -> Result<RefreshToken> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_token.token)
        .bind(new_token.user_id)
        .bind(now)
        .bind(now)
        .bind(new_token.expires_at)
        .execute(self.pool)
        .await?;

        self.get_by_token(&new_token.token)
            .await?
            .ok_or_else(|| ChirpyError::NotFound("refresh token".to_string()))
    }

    /// Get a refresh token by token string.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let result = sqlx::query_as::<_, RefreshToken>(
            "SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
             FROM refresh_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Revoke a refresh token.
    ///
    /// An already revoked token keeps its original revocation time. Returns
    /// false only if the token does not exist.
    pub async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens
             SET revoked_at = COALESCE(revoked_at, ?), updated_at = ?
             WHERE token = ?",
        )
        .bind(at)
        .bind(at)
        .bind(token)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> RefreshTokenStore for RefreshTokenRepository<'a> {
    async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.create(&NewRefreshToken {
            token: token.to_string(),
            user_id,
            expires_at,
        })
        .await?;
        Ok(())
    }

    async fn lookup_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenState>> {
        Ok(self.get_by_token(token).await?.map(Into::into))
    }

    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool> {
        self.revoke(token, revoked_at).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RefreshTokenManager;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;
    use chrono::Duration;

    async fn setup_db() -> (Database, Uuid) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("token@example.com", "hash"))
            .await
            .unwrap();
        (db, user.id)
    }

    fn new_token(user_id: Uuid, token: &str) -> NewRefreshToken {
        NewRefreshToken {
            token: token.to_string(),
            user_id,
            expires_at: Utc::now() + Duration::days(60),
        }
    }

    #[tokio::test]
    async fn test_create_refresh_token() {
        let (db, user_id) = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());

        let token = repo.create(&new_token(user_id, "test-token-123")).await.unwrap();
        assert_eq!(token.user_id, user_id);
        assert_eq!(token.token, "test-token-123");
        assert!(token.revoked_at.is_none());
        assert!(token.expires_at > token.created_at);
    }

    #[tokio::test]
    async fn test_create_duplicate_token() {
        let (db, user_id) = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());

        repo.create(&new_token(user_id, "same")).await.unwrap();
        let result = repo.create(&new_token(user_id, "same")).await;
        match result {
            Err(ChirpyError::Conflict(entity)) => assert_eq!(entity, "refresh token"),
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_by_token_unknown() {
        let (db, _) = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());

        assert!(repo.get_by_token("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_keeps_first_timestamp() {
        let (db, user_id) = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());
        repo.create(&new_token(user_id, "revoke-me")).await.unwrap();

        let first = Utc::now();
        assert!(repo.revoke("revoke-me", first).await.unwrap());
        let second = first + Duration::minutes(5);
        assert!(repo.revoke("revoke-me", second).await.unwrap());

        let stored = repo.get_by_token("revoke-me").await.unwrap().unwrap();
        assert_eq!(stored.revoked_at, Some(first));
        assert_eq!(stored.updated_at, second);
    }

    #[tokio::test]
    async fn test_revoke_unknown() {
        let (db, _) = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());

        assert!(!repo.revoke("nope", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_tokens_deleted_with_user() {
        let (db, user_id) = setup_db().await;
        let repo = RefreshTokenRepository::new(db.pool());
        repo.create(&new_token(user_id, "cascade")).await.unwrap();

        UserRepository::new(db.pool()).delete_all().await.unwrap();
        assert!(repo.get_by_token("cascade").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_manager_over_sqlite() {
        let (db, user_id) = setup_db().await;
        let manager = RefreshTokenManager::new(RefreshTokenRepository::new(db.pool()));

        let token = manager.issue(user_id, Duration::days(60)).await.unwrap();
        let session = manager
            .refresh(&token, b"secret", Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(session.user_id, user_id);

        manager.revoke(&token).await.unwrap();
        assert!(manager
            .refresh(&token, b"secret", Duration::hours(1))
            .await
            .is_err());
    }
}

//! Chirp model and repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{ChirpyError, Result};

/// A short post.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Chirp {
    /// Unique chirp ID.
    pub id: Uuid,
    /// Post body (already censored).
    pub body: String,
    /// Author.
    pub user_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new chirp.
#[derive(Debug, Clone)]
pub struct NewChirp {
    /// Post body.
    pub body: String,
    /// Author.
    pub user_id: Uuid,
}

/// Listing order by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

impl SortOrder {
    /// Parse a `sort` query value. Anything other than `desc` means ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Repository for chirp operations.
pub struct ChirpRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ChirpRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new chirp.
    pub async fn create(&self, new_chirp: &NewChirp) -> Result<Chirp> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO chirps (id, body, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new_chirp.body)
        .bind(new_chirp.user_id)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChirpyError::NotFound("chirp".to_string()))
    }

    /// Get a chirp by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Chirp>> {
        let chirp = sqlx::query_as::<_, Chirp>(
            "SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(chirp)
    }

    /// List chirps, optionally filtered to one author, ordered by creation time.
    pub async fn list(&self, author: Option<Uuid>, order: SortOrder) -> Result<Vec<Chirp>> {
        // Timestamps are stored as text with variable precision, so rows come
        // back in insertion order and are sorted here.
        let mut chirps = match author {
            Some(user_id) => {
                sqlx::query_as::<_, Chirp>(
                    "SELECT id, body, user_id, created_at, updated_at
                     FROM chirps WHERE user_id = ? ORDER BY rowid",
                )
                .bind(user_id)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Chirp>(
                    "SELECT id, body, user_id, created_at, updated_at
                     FROM chirps ORDER BY rowid",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        chirps.sort_by_key(|c| c.created_at);
        if order == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    /// Delete a chirp. Returns false if it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

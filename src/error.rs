//! Error types for Chirpy.

use thiserror::Error;

/// Common error type for Chirpy.
#[derive(Error, Debug)]
pub enum ChirpyError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A unique constraint was violated (e.g. duplicate email).
    #[error("{0} already exists")]
    Conflict(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ChirpyError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return ChirpyError::Conflict(conflicting_entity(db_err.message()).to_string());
            }
        }
        ChirpyError::Database(e.to_string())
    }
}

/// Name the entity behind a SQLite unique violation such as
/// `UNIQUE constraint failed: users.email`.
fn conflicting_entity(message: &str) -> &'static str {
    let column = message.rsplit(": ").next().unwrap_or(message);
    match column {
        "users.email" => "email",
        "users.id" => "user",
        "chirps.id" => "chirp",
        "refresh_tokens.token" => "refresh token",
        _ => "record",
    }
}

/// Result type alias for Chirpy operations.
pub type Result<T> = std::result::Result<T, ChirpyError>;

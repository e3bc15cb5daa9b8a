//! Database schema and migrations for Chirpy.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded. Ids are UUIDs stored as 16-byte blobs; timestamps are RFC 3339
//! text in UTC.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id              BLOB PRIMARY KEY,
    email           TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL,           -- Argon2id PHC string
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);
"#,
    // v2: chirps
    r#"
CREATE TABLE chirps (
    id          BLOB PRIMARY KEY,
    body        TEXT NOT NULL,
    user_id     BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX idx_chirps_user_id ON chirps(user_id);
"#,
    // v3: refresh tokens
    r#"
CREATE TABLE refresh_tokens (
    token       TEXT PRIMARY KEY,
    user_id     BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL,
    revoked_at  TEXT
);

CREATE INDEX idx_refresh_tokens_user_id ON refresh_tokens(user_id);
"#,
    // v4: Chirpy Red membership flag
    r#"
ALTER TABLE users ADD COLUMN is_chirpy_red INTEGER NOT NULL DEFAULT 0;
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_first_migration_contains_users_table() {
        let first = MIGRATIONS[0];
        assert!(first.contains("CREATE TABLE users"));
        assert!(first.contains("email"));
        assert!(first.contains("UNIQUE"));
        assert!(first.contains("hashed_password"));
    }

    #[test]
    fn test_migrations_are_valid_sql() {
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
            assert!(
                migration.contains("CREATE TABLE")
                    || migration.contains("ALTER TABLE")
                    || migration.contains("CREATE INDEX")
            );
        }
    }

    #[test]
    fn test_chirps_cascade_on_user_delete() {
        let chirps = MIGRATIONS[1];
        assert!(chirps.contains("CREATE TABLE chirps"));
        assert!(chirps.contains("REFERENCES users(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_refresh_tokens_migration() {
        let tokens = MIGRATIONS[2];
        assert!(tokens.contains("CREATE TABLE refresh_tokens"));
        assert!(tokens.contains("token       TEXT PRIMARY KEY"));
        assert!(tokens.contains("expires_at"));
        assert!(tokens.contains("revoked_at  TEXT\n"));
        assert!(tokens.contains("ON DELETE CASCADE"));
    }
}

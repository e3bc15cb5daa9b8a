//! Configuration module for Chirpy.

use serde::Deserialize;
use std::path::Path;

use crate::{ChirpyError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/chirpy.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    #[serde(default = "default_session_token_ttl")]
    pub session_token_ttl_secs: u64,
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Shared key the payment provider sends on webhook calls.
    #[serde(default)]
    pub polka_key: String,
    /// Argon2 work factor.
    #[serde(default)]
    pub password: PasswordConfig,
}

fn default_session_token_ttl() -> u64 {
    3600 // 1 hour
}

fn default_refresh_token_ttl() -> u64 {
    60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_token_ttl_secs: default_session_token_ttl(),
            refresh_token_ttl_days: default_refresh_token_ttl(),
            polka_key: String::new(),
            password: PasswordConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Session token lifetime as a duration.
    ///
    /// Fails if the lifetime is zero or too large to add to the current time.
    pub fn session_token_ttl(&self) -> Result<chrono::Duration> {
        i64::try_from(self.session_token_ttl_secs)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .and_then(usable_ttl)
            .ok_or_else(|| {
                ChirpyError::Config(format!(
                    "session_token_ttl_secs out of range: {}",
                    self.session_token_ttl_secs
                ))
            })
    }

    /// Refresh token lifetime as a duration.
    ///
    /// Fails if the lifetime is zero or too large to add to the current time.
    pub fn refresh_token_ttl(&self) -> Result<chrono::Duration> {
        i64::try_from(self.refresh_token_ttl_days)
            .ok()
            .and_then(chrono::TimeDelta::try_days)
            .and_then(usable_ttl)
            .ok_or_else(|| {
                ChirpyError::Config(format!(
                    "refresh_token_ttl_days out of range: {}",
                    self.refresh_token_ttl_days
                ))
            })
    }
}

fn usable_ttl(ttl: chrono::TimeDelta) -> Option<chrono::TimeDelta> {
    let fits = chrono::Utc::now().checked_add_signed(ttl).is_some();
    (ttl > chrono::TimeDelta::zero() && fits).then_some(ttl)
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of iterations.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    65536 // 64 MB
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Deployment platform. Destructive admin endpoints only run on "dev".
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Directory served under `/app`.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_platform() -> String {
    "prod".to_string()
}

fn default_static_path() -> String {
    ".".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            static_path: default_static_path(),
            cors_origins: vec![],
        }
    }
}

impl WebConfig {
    /// Whether the service runs on a development platform.
    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/chirpy.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ChirpyError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ChirpyError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `JWT_SECRET`: session token signing secret
    /// - `POLKA_KEY`: webhook API key
    /// - `PLATFORM`: deployment platform
    /// - `DB_PATH`: SQLite database path
    pub fn apply_env_overrides(&mut self) {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        if let Some(secret) = non_empty("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(key) = non_empty("POLKA_KEY") {
            self.auth.polka_key = key;
        }
        if let Some(platform) = non_empty("PLATFORM") {
            self.web.platform = platform;
        }
        if let Some(path) = non_empty("DB_PATH") {
            self.database.path = path;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the JWT secret is not set or a token lifetime is
    /// zero or out of range.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ChirpyError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via the JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        self.auth.session_token_ttl()?;
        self.auth.refresh_token_ttl()?;
        Ok(())
    }
}

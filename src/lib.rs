//! Chirpy - a small social posting service.
//!
//! Users post short chirps over a JSON API. Accounts log in with an email and
//! password and receive a short-lived signed session token plus a revocable
//! refresh token stored in SQLite.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod profanity;
pub mod web;

pub use auth::{
    extract_api_key, extract_bearer, issue_session_token, verify_password, verify_session_token,
    CredentialError, PasswordError, PasswordHasher, RefreshTokenError, RefreshTokenManager,
    RefreshTokenStore, TokenError,
};
pub use config::Config;
pub use db::{Chirp, ChirpRepository, Database, NewUser, RefreshTokenRepository, User, UserRepository};
pub use error::{ChirpyError, Result};

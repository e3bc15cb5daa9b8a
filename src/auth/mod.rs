//! Authentication module for Chirpy.
//!
//! This module provides password hashing, session token issuance and
//! verification, refresh token management, and credential extraction from
//! request headers.

mod credentials;
mod password;
mod refresh;
mod token;

pub use credentials::{
    api_key_from_headers, bearer_from_headers, extract_api_key, extract_bearer, CredentialError,
    API_KEY_SCHEME,
};
pub use password::{verify_password, PasswordError, PasswordHasher};
pub use refresh::{
    is_usable, RefreshTokenError, RefreshTokenManager, RefreshTokenState, RefreshTokenStore,
    RefreshedSession, REFRESH_TOKEN_BYTES,
};
pub use token::{issue_session_token, verify_session_token, SessionClaims, TokenError, ISSUER};

//! Session token (JWT) issuance and verification.
//!
//! Session tokens are HS256-signed JWTs carrying only issuer, subject,
//! issued-at and expiry. Nothing about them is stored server side, so a
//! token stays valid until its `exp` passes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Value of the `iss` claim on every session token.
pub const ISSUER: &str = "chirpy";

/// Session token errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("failed to sign session token: {0}")]
    Signing(String),

    /// Signature does not match the secret.
    #[error("session token signature is invalid")]
    SignatureInvalid,

    /// Token is past its expiry.
    #[error("session token has expired")]
    Expired,

    /// The `sub` claim is not a user id.
    #[error("session token subject is not a valid user id")]
    SubjectUnparsable,

    /// Token is not a well-formed JWT.
    #[error("malformed session token")]
    Malformed,
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer.
    pub iss: String,
    /// Subject (user ID).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

/// Issue a session token for `subject`, valid for `ttl` from now.
///
/// A negative `ttl` yields a token that is already expired. A `ttl` that
/// pushes the expiry past the representable date range fails with
/// [`TokenError::Signing`].
pub fn issue_session_token(
    subject: Uuid,
    secret: &[u8],
    ttl: Duration,
) -> Result<String, TokenError> {
    issue_at(subject, secret, ttl, Utc::now())
}

/// Verify a session token and return the user ID it was issued for.
///
/// Checks run in a fixed order: signature and structure first, then expiry
/// (a token whose `exp` equals the current second is expired), then the
/// subject.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Result<Uuid, TokenError> {
    verify_at(token, secret, Utc::now())
}

fn issue_at(
    subject: Uuid,
    secret: &[u8],
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| TokenError::Signing("session token expiry is out of range".to_string()))?;
    let claims = SessionClaims {
        iss: ISSUER.to_string(),
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| {
        tracing::error!("Failed to encode JWT: {}", e);
        TokenError::Signing(e.to_string())
    })
}

fn verify_at(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<Uuid, TokenError> {
    // Expiry is compared below with a strict boundary and no leeway
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureInvalid
                }
                _ => TokenError::Malformed,
            }
        })?;

    if data.claims.exp <= now.timestamp() {
        return Err(TokenError::Expired);
    }

    Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::SubjectUnparsable)
}

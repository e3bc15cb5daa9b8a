//! Credential extraction from the `Authorization` header.
//!
//! The header value is split on single spaces into a scheme word and a
//! credential. For bearer credentials the scheme word is not checked, so
//! `Token abc` yields `abc` just like `Bearer abc`.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use thiserror::Error;

/// Scheme word expected in front of a webhook API key.
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Credential extraction errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// No header, or an empty one.
    #[error("no authorization header found")]
    HeaderMissing,

    /// The header has no credential after the scheme word.
    #[error("no credential found in authorization header")]
    SchemeMissing,
}

/// Split a header value into its scheme word and credential.
fn split_scheme(header: Option<&str>) -> Result<(&str, &str), CredentialError> {
    let value = header
        .filter(|v| !v.is_empty())
        .ok_or(CredentialError::HeaderMissing)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(credential)) => Ok((scheme, credential)),
        _ => Err(CredentialError::SchemeMissing),
    }
}

/// Extract a bearer credential from an `Authorization` header value.
///
/// # Examples
///
/// ```
/// use chirpy::auth::{extract_bearer, CredentialError};
///
/// assert_eq!(extract_bearer(Some("Bearer abc123")).unwrap(), "abc123");
/// assert_eq!(extract_bearer(None), Err(CredentialError::HeaderMissing));
/// assert_eq!(extract_bearer(Some("Bearer")), Err(CredentialError::SchemeMissing));
/// ```
pub fn extract_bearer(header: Option<&str>) -> Result<String, CredentialError> {
    split_scheme(header).map(|(_, credential)| credential.to_string())
}

/// Extract a static API key from an `Authorization: ApiKey <key>` header value.
///
/// The scheme word is matched case-insensitively.
pub fn extract_api_key(header: Option<&str>) -> Result<String, CredentialError> {
    match split_scheme(header)? {
        (scheme, key) if scheme.eq_ignore_ascii_case(API_KEY_SCHEME) => Ok(key.to_string()),
        _ => Err(CredentialError::SchemeMissing),
    }
}

/// Raw `Authorization` header value, if present and valid UTF-8.
fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Extract a bearer credential from request headers.
pub fn bearer_from_headers(headers: &HeaderMap) -> Result<String, CredentialError> {
    extract_bearer(authorization(headers))
}

/// Extract a webhook API key from request headers.
pub fn api_key_from_headers(headers: &HeaderMap) -> Result<String, CredentialError> {
    extract_api_key(authorization(headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(Some("Bearer abc123")).unwrap(), "abc123");
    }

    #[test]
    fn test_extract_bearer_missing() {
        assert_eq!(extract_bearer(None), Err(CredentialError::HeaderMissing));
        assert_eq!(extract_bearer(Some("")), Err(CredentialError::HeaderMissing));
    }

    #[test]
    fn test_extract_bearer_no_credential() {
        assert_eq!(
            extract_bearer(Some("Bearer")),
            Err(CredentialError::SchemeMissing)
        );
        assert_eq!(
            extract_bearer(Some("abc123")),
            Err(CredentialError::SchemeMissing)
        );
    }

    #[test]
    fn test_extract_bearer_any_scheme() {
        assert_eq!(extract_bearer(Some("Token xyz")).unwrap(), "xyz");
        assert_eq!(extract_bearer(Some("bearer xyz")).unwrap(), "xyz");
    }

    #[test]
    fn test_extract_bearer_takes_second_piece_verbatim() {
        assert_eq!(extract_bearer(Some("Bearer a b")).unwrap(), "a");
        // Double space leaves an empty second piece
        assert_eq!(extract_bearer(Some("Bearer  abc")).unwrap(), "");
        assert_eq!(extract_bearer(Some("Bearer ")).unwrap(), "");
    }

    #[test]
    fn test_extract_api_key() {
        assert_eq!(extract_api_key(Some("ApiKey f271c81ff")).unwrap(), "f271c81ff");
        assert_eq!(extract_api_key(Some("apikey f271c81ff")).unwrap(), "f271c81ff");
    }

    #[test]
    fn test_extract_api_key_errors() {
        assert_eq!(extract_api_key(None), Err(CredentialError::HeaderMissing));
        assert_eq!(extract_api_key(Some("")), Err(CredentialError::HeaderMissing));
        assert_eq!(
            extract_api_key(Some("ApiKey")),
            Err(CredentialError::SchemeMissing)
        );
        assert_eq!(
            extract_api_key(Some("Bearer f271c81ff")),
            Err(CredentialError::SchemeMissing)
        );
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            bearer_from_headers(&headers),
            Err(CredentialError::HeaderMissing)
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(bearer_from_headers(&headers).unwrap(), "tok");
        assert_eq!(
            api_key_from_headers(&headers),
            Err(CredentialError::SchemeMissing)
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("ApiKey key"));
        assert_eq!(api_key_from_headers(&headers).unwrap(), "key");
    }

    #[test]
    fn test_non_utf8_header_is_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(
            bearer_from_headers(&headers),
            Err(CredentialError::HeaderMissing)
        );
    }
}

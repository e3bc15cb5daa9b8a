//! Request DTOs for Web API.

use serde::Deserialize;
use uuid::Uuid;

/// Email and password, used for sign-up, login and credential changes.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// New chirp.
#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    /// Post body.
    pub body: String,
}

/// Query parameters for listing chirps.
#[derive(Debug, Default, Deserialize)]
pub struct ChirpListQuery {
    /// Only chirps by this author.
    #[serde(default)]
    pub author_id: Option<String>,
    /// `asc` (default) or `desc`.
    #[serde(default)]
    pub sort: Option<String>,
}

/// Polka webhook payload.
#[derive(Debug, Deserialize)]
pub struct PolkaWebhookRequest {
    /// Event name.
    pub event: String,
    /// Event data.
    pub data: PolkaWebhookData,
}

/// Polka webhook event data.
#[derive(Debug, Deserialize)]
pub struct PolkaWebhookData {
    /// Affected user.
    pub user_id: Uuid,
}

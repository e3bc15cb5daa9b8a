//! Admin handlers.

use axum::{extract::State, response::Html};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::db::UserRepository;
use crate::web::error::ApiError;

use super::AppState;

/// GET /admin/metrics - Visit count.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Html<String> {
    let hits = state.file_server_hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>",
        hits
    ))
}

/// POST /admin/reset - Delete every user and zero the hit counter.
///
/// Only available on the dev platform.
pub async fn reset(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    if !state.is_dev {
        return Err(ApiError::forbidden(
            "Reset is only allowed in dev environment",
        ));
    }

    let deleted = UserRepository::new(state.db.pool()).delete_all().await?;
    state.file_server_hits.store(0, Ordering::Relaxed);

    tracing::warn!(deleted_users = deleted, "Database reset");
    Ok("Hits reset to 0 and database reset to initial state.")
}

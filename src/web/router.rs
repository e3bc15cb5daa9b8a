//! Router configuration for the HTTP API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;

use super::handlers::{
    create_chirp, create_user, delete_chirp, get_chirp, list_chirps, login, metrics,
    polka_webhook, refresh, reset, revoke, update_user, AppState,
};
use super::middleware::{count_hits, create_cors_layer};

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    let api_routes = Router::new()
        .route("/healthz", get(health_check))
        .route("/users", post(create_user).put(update_user))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/revoke", post(revoke))
        .route("/chirps", post(create_chirp).get(list_chirps))
        .route("/chirps/:chirp_id", get(get_chirp).delete(delete_chirp))
        .route("/polka/webhooks", post(polka_webhook))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), count_hits));

    let admin_routes = Router::new()
        .route("/metrics", get(metrics))
        .route("/reset", post(reset));

    // File server and API requests count as visits; admin requests do not
    let app_routes = Router::new()
        .nest_service("/app", ServeDir::new(&config.static_path))
        .layer(middleware::from_fn_with_state(app_state.clone(), count_hits));

    Router::new()
        .nest("/api", api_routes)
        .nest("/admin", admin_routes)
        .merge(app_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins)),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

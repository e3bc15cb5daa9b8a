//! Shared helpers for HTTP API tests.

#![allow(dead_code)]

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use chirpy::config::{AuthConfig, PasswordConfig, WebConfig};
use chirpy::web::create_router;
use chirpy::web::AppState;
use chirpy::Database;
use serde_json::{json, Value};
use std::sync::Arc;

/// Secret used to sign session tokens in tests.
pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Webhook key used in tests.
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Auth configuration with a cheap Argon2 work factor.
pub fn create_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: JWT_SECRET.to_string(),
        polka_key: POLKA_KEY.to_string(),
        password: PasswordConfig {
            memory_kib: 4096,
            iterations: 1,
            parallelism: 1,
        },
        ..AuthConfig::default()
    }
}

/// Web configuration for the given platform and static directory.
pub fn create_web_config(platform: &str, static_path: &str) -> WebConfig {
    WebConfig {
        platform: platform.to_string(),
        static_path: static_path.to_string(),
        cors_origins: vec![],
    }
}

/// Create application state over an in-memory database.
pub async fn create_app_state(web: &WebConfig) -> AppState {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    AppState::new(db, &create_auth_config(), web).expect("Failed to create app state")
}

/// Create a test server around prepared application state.
pub fn create_test_server_from(app_state: AppState, web: &WebConfig) -> (TestServer, Arc<AppState>) {
    let app_state = Arc::new(app_state);
    let router = create_router(app_state.clone(), web);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, app_state)
}

/// Create a test server with an in-memory database.
pub async fn create_test_server_with(web: WebConfig) -> (TestServer, Arc<AppState>) {
    let app_state = create_app_state(&web).await;
    create_test_server_from(app_state, &web)
}

/// Create a dev-platform test server.
pub async fn create_test_server() -> (TestServer, Arc<AppState>) {
    create_test_server_with(create_web_config("dev", ".")).await
}

/// Create a user and return the response body.
pub async fn create_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/users")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Log in and return the response body.
pub async fn login(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/login")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    response.assert_status_ok();
    response.json::<Value>()
}

/// Create a user, log in, and return the login body.
pub async fn signed_in_user(server: &TestServer, email: &str) -> Value {
    create_user(server, email, "04234").await;
    login(server, email, "04234").await
}

/// Post a chirp as the holder of `token`.
pub async fn post_chirp(server: &TestServer, token: &str, body: &str) -> Value {
    let response = server
        .post("/api/chirps")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "body": body }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

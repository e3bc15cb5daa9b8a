//! Middleware for Web API.

pub mod auth;
pub mod cors;
pub mod metrics;

pub use auth::AuthUser;
pub use cors::create_cors_layer;
pub use metrics::count_hits;

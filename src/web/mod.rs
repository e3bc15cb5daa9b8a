//! HTTP API for Chirpy.
//!
//! JSON endpoints under `/api`, admin pages under `/admin` and static files
//! under `/app`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;

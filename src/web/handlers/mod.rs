//! API handlers.

pub mod admin;
pub mod auth;
pub mod chirp;
pub mod user;
pub mod webhook;

pub use admin::*;
pub use auth::*;
pub use chirp::*;
pub use user::*;
pub use webhook::*;

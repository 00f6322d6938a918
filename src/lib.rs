//! Gatehouse Authentication Library
//!
//! This library provides account registration, credential login and token
//! logout, backed by bcrypt password hashes, HMAC-signed JWTs and an
//! in-process revocation cache.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::ApiServer;
pub use auth::AuthService;
pub use crate::core::{Config, ServiceError};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for the library
pub type Result<T> = anyhow::Result<T>;

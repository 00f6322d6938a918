//! Database module
//!
//! This module provides the credential store boundary:
//! - The `CredentialStore` capability trait consumed by the auth service
//! - A SQLite-backed store over an r2d2 connection pool
//! - An in-memory store for tests and embedding
//! - Schema migrations and the `User` record

pub mod manager;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod repository;

pub use manager::DatabaseManager;
pub use memory::MemoryCredentialStore;
pub use models::{User, ROLE_CUSTOMER};
pub use repository::{CredentialStore, SqliteCredentialStore};

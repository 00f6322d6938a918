//! Authentication module
//!
//! This module provides authentication functionality including:
//! - User registration, login and logout
//! - JWT token issuance and validation
//! - Password hashing and verification
//! - Revocation tracking for logged-out tokens

pub mod handlers;
pub mod jwt;
pub mod models;
pub mod outcome;
pub mod password;
pub mod revocation;
pub mod service;

pub use jwt::{SigningSecret, TokenClaims, TokenInvalid, TokenIssuer};
pub use outcome::{AuthOutcome, FieldViolation, LoggedIn, LoggedOut, Registered, Rejection};
pub use password::{hash_password, verify_password};
pub use revocation::{MemoryRevocationCache, RevocationCache};
pub use service::AuthService;
pub use handlers::{login, logout, register};

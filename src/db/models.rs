//! Database models
//!
//! Data structures representing database tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to every self-registered user
pub const ROLE_CUSTOMER: &str = "customer";

/// User record in the credential store
///
/// `password_hash` is a bcrypt string; the raw password is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_code: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

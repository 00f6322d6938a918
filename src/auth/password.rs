//! Password hashing and verification using bcrypt

use crate::core::error::{Result, ServiceError};

/// bcrypt cost factor. Fixed so request latency stays predictable.
pub const PASSWORD_HASH_COST: u32 = 10;

/// Longest password bcrypt reads in full; anything past it would be ignored
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt with a fresh random salt
///
/// Passwords longer than `MAX_PASSWORD_BYTES` are refused rather than truncated.
pub fn hash_password(password: &str) -> Result<String> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ServiceError::PasswordHash(format!(
            "Password exceeds {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }

    bcrypt::hash(password, PASSWORD_HASH_COST)
        .map_err(|e| ServiceError::PasswordHash(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash
///
/// A wrong password is `Ok(false)`; a hash that is not a valid bcrypt string
/// is an error. A password over `MAX_PASSWORD_BYTES` never matches, since no
/// stored hash can have been made from it.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let matches = bcrypt::verify(password, hash)
        .map_err(|e| ServiceError::PasswordHash(format!("Failed to verify password: {}", e)))?;

    Ok(matches && password.len() <= MAX_PASSWORD_BYTES)
}

/// Run `hash_password` off the async runtime
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::Task(format!("Hashing task panicked: {}", e)))?
}

/// Run `verify_password` off the async runtime
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ServiceError::Task(format!("Verification task panicked: {}", e)))?
}

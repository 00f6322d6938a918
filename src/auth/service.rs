//! Authentication service
//!
//! Orchestrates registration, login and logout over the credential store,
//! password hashing, token issuance and the revocation cache. Holds no
//! per-request state; every collaborator is injected once at construction.

use crate::auth::jwt::{TokenClaims, TokenIssuer};
use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::auth::outcome::{AuthOutcome, LoggedIn, LoggedOut, Registered, Rejection};
use crate::auth::password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
};
use crate::auth::revocation::RevocationCache;
use crate::core::error::{Result, ServiceError};
use crate::db::models::{User, ROLE_CUSTOMER};
use crate::db::repository::CredentialStore;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Scheme expected in the `authorization` metadata
pub const BEARER_SCHEME: &str = "Bearer";

lazy_static! {
    /// Verified against when the email is unknown, so login costs the same
    /// whether or not the account exists
    static ref DUMMY_PASSWORD_HASH: String = hash_password("gatehouse-dummy-password")
        .expect("bcrypt hashes a short constant password");
}

/// Register, login and logout flows
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    revocations: Arc<dyn RevocationCache>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        revocations: Arc<dyn RevocationCache>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            store,
            revocations,
            tokens,
        }
    }

    /// Create an account for a new email address
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthOutcome<Registered>> {
        if request.password != request.password_confirmation {
            warn!(email = %request.email, "Registration rejected: password confirmation mismatch");
            return Ok(AuthOutcome::Rejected(Rejection::PasswordMismatch));
        }

        if self.store.find_by_email(&request.email).await?.is_some() {
            warn!(email = %request.email, "Registration rejected: user already exists");
            return Ok(AuthOutcome::Rejected(Rejection::UserAlreadyExists));
        }

        let password_hash = hash_password_blocking(request.password.clone()).await?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            full_name: request.full_name.clone(),
            email: request.email.clone(),
            password_hash,
            role_code: ROLE_CUSTOMER.to_string(),
            created_at: Utc::now(),
            created_by: Some(request.full_name.clone()),
        };

        // A concurrent registration for the same email fails here on the
        // store's uniqueness guarantee and surfaces as an internal error
        self.store.insert(&user).await?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        Ok(AuthOutcome::Accepted(Registered))
    }

    /// Check credentials and issue a session token
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthOutcome<LoggedIn>> {
        let user = match self.store.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                let password = request.password.clone();
                tokio::task::spawn_blocking(move || {
                    verify_password(&password, &DUMMY_PASSWORD_HASH).map(|_| ())
                })
                .await
                .map_err(|e| ServiceError::Task(format!("Verification task panicked: {}", e)))??;
                warn!(email = %request.email, "Login rejected");
                return Err(ServiceError::Unauthenticated);
            }
        };

        let matches =
            verify_password_blocking(request.password.clone(), user.password_hash.clone()).await?;
        if !matches {
            warn!(email = %request.email, "Login rejected");
            return Err(ServiceError::Unauthenticated);
        }

        let claims = TokenClaims::for_user(&user, Utc::now());
        let access_token = self.tokens.issue(&claims)?;

        info!(user_id = %user.id, "Login successful");
        Ok(AuthOutcome::Accepted(LoggedIn { access_token }))
    }

    /// Revoke the bearer token carried in `metadata` until it expires
    pub async fn logout(&self, metadata: &HeaderMap) -> Result<AuthOutcome<LoggedOut>> {
        let token = bearer_token(metadata).ok_or_else(|| {
            warn!("Logout rejected: malformed authorization metadata");
            ServiceError::Unauthenticated
        })?;

        let now = Utc::now();
        let claims = self.tokens.parse_at(token, now.timestamp()).map_err(|e| {
            warn!("Logout rejected: invalid token");
            e
        })?;

        let ttl = remaining_lifetime(&claims, now);
        self.revocations.revoke(token, ttl).await?;

        info!(user_id = %claims.sub, ttl_ms = ttl.as_millis() as u64, "Logout successful");
        Ok(AuthOutcome::Accepted(LoggedOut))
    }
}

/// Extract the token from exactly one `authorization: Bearer <token>` value
pub fn bearer_token(metadata: &HeaderMap) -> Option<&str> {
    let mut values = metadata.get_all(AUTHORIZATION).iter();
    let value = values.next()?;
    if values.next().is_some() {
        return None;
    }

    let mut parts = value.to_str().ok()?.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || scheme != BEARER_SCHEME || token.is_empty() {
        return None;
    }

    Some(token)
}

/// Time left until the token's `exp`, zero if already past
pub fn remaining_lifetime(claims: &TokenClaims, now: DateTime<Utc>) -> Duration {
    let remaining_ms = claims.exp.saturating_mul(1000) - now.timestamp_millis();
    Duration::from_millis(remaining_ms.max(0) as u64)
}

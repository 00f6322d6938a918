//! JWT token generation and validation

use crate::core::error::{Result, ServiceError};
use crate::db::models::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifetime of every issued token. No sliding expiration.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Symmetric key used to sign and verify session tokens
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Identity and timing facts bound into a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    /// Issued at, seconds since epoch
    pub iat: i64,
    /// Expires at, seconds since epoch
    pub exp: i64,
}

impl TokenClaims {
    /// Claims for a user session starting at `now`
    pub fn for_user(user: &User, now: DateTime<Utc>) -> Self {
        let issued_at = now.timestamp();
        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role_code.clone(),
            iat: issued_at,
            exp: issued_at + Duration::hours(TOKEN_LIFETIME_HOURS).num_seconds(),
        }
    }
}

/// A token that failed validation. The cause is deliberately not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Token is invalid")]
pub struct TokenInvalid;

impl From<TokenInvalid> for ServiceError {
    fn from(_: TokenInvalid) -> Self {
        ServiceError::Unauthenticated
    }
}

/// Issues and parses HMAC-signed session tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Build an issuer; the secret is read once here
    pub fn new(secret: &SigningSecret) -> Self {
        // Any HMAC variant is accepted, everything else (RS*, ES*, none) is not
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_required_spec_claims(&["exp", "sub"]);
        // Expiry is checked in `parse_at` against an explicit clock
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign claims into a compact token
    pub fn issue(&self, claims: &TokenClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ServiceError::TokenSigning(format!("Failed to generate token: {}", e)))
    }

    /// Validate a token against the current time
    pub fn parse(&self, raw_token: &str) -> std::result::Result<TokenClaims, TokenInvalid> {
        self.parse_at(raw_token, Utc::now().timestamp())
    }

    /// Validate a token as of `now` (seconds since epoch)
    ///
    /// The token is valid while `now < exp`.
    pub fn parse_at(&self, raw_token: &str, now: i64) -> std::result::Result<TokenClaims, TokenInvalid> {
        let token_data = decode::<TokenClaims>(raw_token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenInvalid
            })?;

        if token_data.claims.exp <= now {
            tracing::debug!("Token rejected: expired");
            return Err(TokenInvalid);
        }

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ROLE_CUSTOMER;
    use chrono::TimeZone;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&SigningSecret::new("test-secret-test-secret-test-secret"))
    }

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            full_name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: String::new(),
            role_code: ROLE_CUSTOMER.to_string(),
            created_at: Utc::now(),
            created_by: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_claims_expire_after_24_hours() {
        let claims = TokenClaims::for_user(&user(), now());

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, ROLE_CUSTOMER);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.exp, (now() + Duration::hours(24)).timestamp());
    }

    #[test]
    fn test_token_valid_until_expiry() {
        let issuer = issuer();
        let claims = TokenClaims::for_user(&user(), now());
        let token = issuer.issue(&claims).unwrap();

        assert_eq!(issuer.parse_at(&token, claims.iat), Ok(claims.clone()));
        assert!(issuer.parse_at(&token, claims.exp - 1).is_ok());
        assert_eq!(issuer.parse_at(&token, claims.exp), Err(TokenInvalid));
        assert_eq!(issuer.parse_at(&token, claims.exp + 3600), Err(TokenInvalid));
    }

    #[test]
    fn test_parse_uses_wall_clock() {
        let issuer = issuer();
        let claims = TokenClaims::for_user(&user(), Utc::now());
        let token = issuer.issue(&claims).unwrap();
        assert!(issuer.parse(&token).is_ok());

        let stale = TokenClaims::for_user(&user(), Utc::now() - Duration::hours(25));
        let token = issuer.issue(&stale).unwrap();
        assert_eq!(issuer.parse(&token), Err(TokenInvalid));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = TokenClaims::for_user(&user(), now());
        let token = issuer().issue(&claims).unwrap();

        let other = TokenIssuer::new(&SigningSecret::new("another-secret-another-secret-xx"));
        assert_eq!(other.parse_at(&token, claims.iat), Err(TokenInvalid));
    }

    #[test]
    fn test_other_hmac_variant_accepted() {
        let secret = SigningSecret::new("test-secret-test-secret-test-secret");
        let claims = TokenClaims::for_user(&user(), now());
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(TokenIssuer::new(&secret).parse_at(&token, claims.iat).is_ok());
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        let issuer = issuer();
        let claims = TokenClaims::for_user(&user(), now());
        let token = issuer.issue(&claims).unwrap();

        // Swap the header for one claiming RS256, keep payload and signature
        let mut parts = token.split('.');
        let _header = parts.next().unwrap();
        let payload = parts.next().unwrap();
        let signature = parts.next().unwrap();
        // {"alg":"RS256","typ":"JWT"}
        let forged = format!("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{}.{}", payload, signature);
        assert_eq!(issuer.parse_at(&forged, claims.iat), Err(TokenInvalid));

        // {"alg":"none","typ":"JWT"}
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);
        assert_eq!(issuer.parse_at(&unsigned, claims.iat), Err(TokenInvalid));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let issuer = issuer();
        let claims = TokenClaims::for_user(&user(), now());
        let token = issuer.issue(&claims).unwrap();

        let mut admin = claims.clone();
        admin.role = "admin".to_string();
        let forged_payload = issuer.issue(&admin).unwrap();

        let original: Vec<&str> = token.split('.').collect();
        let forged: Vec<&str> = forged_payload.split('.').collect();
        let spliced = format!("{}.{}.{}", original[0], forged[1], original[2]);

        assert_eq!(issuer.parse_at(&spliced, claims.iat), Err(TokenInvalid));
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = issuer();
        for raw in ["", "abc", "a.b.c", "Bearer x"] {
            assert_eq!(issuer.parse_at(raw, 0), Err(TokenInvalid));
        }
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let secret = SigningSecret::new("super-secret-value");
        assert!(!format!("{:?}", secret).contains("super-secret-value"));
    }
}

//! Authentication request/response models

use crate::auth::outcome::{AuthOutcome, FieldViolation};
use crate::auth::password::MAX_PASSWORD_BYTES;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MAX_FULL_NAME_LEN: usize = 255;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

/// Register request
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterRequest {
    /// Check request shape; an empty list means the request is well-formed
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.full_name.trim().is_empty() {
            violations.push(FieldViolation::new("full_name", "full_name is required"));
        } else if self.full_name.chars().count() > MAX_FULL_NAME_LEN {
            violations.push(FieldViolation::new(
                "full_name",
                format!("full_name must be at most {} characters", MAX_FULL_NAME_LEN),
            ));
        }

        if !EMAIL_PATTERN.is_match(&self.email) {
            violations.push(FieldViolation::new("email", "email must be a valid email address"));
        }

        if self.password.is_empty() {
            violations.push(FieldViolation::new("password", "password is required"));
        } else if self.password.len() > MAX_PASSWORD_BYTES {
            violations.push(FieldViolation::new(
                "password",
                format!("password must be at most {} bytes", MAX_PASSWORD_BYTES),
            ));
        }

        if self.password_confirmation.is_empty() {
            violations.push(FieldViolation::new(
                "password_confirmation",
                "password_confirmation is required",
            ));
        }

        violations
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Login request
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.email.is_empty() {
            violations.push(FieldViolation::new("email", "email is required"));
        }

        if self.password.is_empty() {
            violations.push(FieldViolation::new("password", "password is required"));
        }

        violations
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Envelope carried by every structured response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResponse {
    pub is_success: bool,
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<ValidationErrorItem>,
}

/// Wire form of a field violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorItem {
    pub field: String,
    pub message: String,
}

impl BaseResponse {
    pub fn success(message: &str) -> Self {
        Self {
            is_success: true,
            code: 200,
            message: message.to_string(),
            validation_errors: Vec::new(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            is_success: false,
            code: 400,
            message: message.to_string(),
            validation_errors: Vec::new(),
        }
    }

    pub fn validation_error(violations: Vec<FieldViolation>) -> Self {
        Self {
            validation_errors: violations
                .into_iter()
                .map(|v| ValidationErrorItem { field: v.field, message: v.message })
                .collect(),
            ..Self::bad_request("Validation error")
        }
    }

    /// Envelope for an outcome, with `success_message` for the accepted case
    pub fn from_outcome<T>(outcome: &AuthOutcome<T>, success_message: &str) -> Self {
        match outcome {
            AuthOutcome::Accepted(_) => Self::success(success_message),
            AuthOutcome::Rejected(crate::auth::outcome::Rejection::Validation(violations)) => {
                Self::validation_error(violations.clone())
            }
            AuthOutcome::Rejected(rejection) => Self::bad_request(rejection.message()),
        }
    }
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub base: BaseResponse,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub base: BaseResponse,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_token: String,
}

/// Logout response
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub base: BaseResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::outcome::Rejection;

    fn register(full_name: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            password_confirmation: "secret".to_string(),
        }
    }

    #[test]
    fn test_valid_register_request() {
        assert!(register("Alice", "a@x.com").validate().is_empty());
    }

    #[test]
    fn test_register_violations() {
        let violations = register("  ", "not-an-email").validate();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["full_name", "email"]);

        let long_name = "x".repeat(256);
        assert_eq!(register(&long_name, "a@x.com").validate().len(), 1);
    }

    #[test]
    fn test_register_password_length_limit() {
        let mut request = register("Alice", "a@x.com");
        request.password = "a".repeat(MAX_PASSWORD_BYTES);
        assert!(request.validate().is_empty());

        // Multi-byte characters count by their encoded length
        request.password = "é".repeat(MAX_PASSWORD_BYTES / 2 + 1);
        let violations = request.validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "password");
    }

    #[test]
    fn test_login_violations() {
        let request = LoginRequest { email: String::new(), password: String::new() };
        assert_eq!(request.validate().len(), 2);
    }

    #[test]
    fn test_debug_hides_passwords() {
        let mut request = register("Alice", "a@x.com");
        request.password = "hunter2".to_string();
        assert!(!format!("{:?}", request).contains("hunter2"));
    }

    #[test]
    fn test_envelope_from_outcome() {
        let accepted: AuthOutcome<()> = AuthOutcome::Accepted(());
        assert_eq!(
            BaseResponse::from_outcome(&accepted, "done"),
            BaseResponse::success("done")
        );

        let rejected: AuthOutcome<()> = AuthOutcome::Rejected(Rejection::UserAlreadyExists);
        let base = BaseResponse::from_outcome(&rejected, "done");
        assert!(!base.is_success);
        assert_eq!(base.code, 400);
        assert_eq!(base.message, "User already exists");
    }

    #[test]
    fn test_validation_envelope_serialization() {
        let base = BaseResponse::validation_error(vec![FieldViolation::new("email", "bad")]);
        let json = serde_json::to_value(&base).unwrap();

        assert_eq!(json["is_success"], false);
        assert_eq!(json["code"], 400);
        assert_eq!(json["validation_errors"][0]["field"], "email");

        let plain = serde_json::to_value(BaseResponse::success("ok")).unwrap();
        assert!(plain.get("validation_errors").is_none());
    }
}

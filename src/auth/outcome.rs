//! Outcomes of the authentication flows
//!
//! An operation either fails with a `ServiceError` (the request is aborted) or
//! completes with an `AuthOutcome`, which is accepted or rejected for an
//! expected, caller-facing reason.

use serde::Serialize;

/// Completed result of an auth operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome<T> {
    Accepted(T),
    Rejected(Rejection),
}

impl<T> AuthOutcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AuthOutcome::Accepted(_))
    }

    /// The accepted value, if any
    pub fn accepted(self) -> Option<T> {
        match self {
            AuthOutcome::Accepted(value) => Some(value),
            AuthOutcome::Rejected(_) => None,
        }
    }
}

/// Expected reasons to turn a request down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    PasswordMismatch,
    UserAlreadyExists,
    Validation(Vec<FieldViolation>),
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::PasswordMismatch => "Password is not match",
            Rejection::UserAlreadyExists => "User already exists",
            Rejection::Validation(_) => "Validation error",
        }
    }
}

/// A single invalid request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered;

impl Registered {
    pub const MESSAGE: &'static str = "User successfully registered";
}

/// Successful login
#[derive(Clone, PartialEq, Eq)]
pub struct LoggedIn {
    pub access_token: String,
}

impl LoggedIn {
    pub const MESSAGE: &'static str = "Login successful";
}

impl std::fmt::Debug for LoggedIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggedIn").field("access_token", &"<redacted>").finish()
    }
}

/// Successful logout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedOut;

impl LoggedOut {
    pub const MESSAGE: &'static str = "Logout successful";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::PasswordMismatch.message(), "Password is not match");
        assert_eq!(Rejection::UserAlreadyExists.message(), "User already exists");
        assert_eq!(Rejection::Validation(vec![]).message(), "Validation error");
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: AuthOutcome<u8> = AuthOutcome::Accepted(1);
        assert!(ok.is_accepted());
        assert_eq!(ok.accepted(), Some(1));

        let rejected: AuthOutcome<u8> = AuthOutcome::Rejected(Rejection::UserAlreadyExists);
        assert!(!rejected.is_accepted());
        assert_eq!(rejected.accepted(), None);
    }

    #[test]
    fn test_logged_in_debug_hides_token() {
        let logged_in = LoggedIn { access_token: "eyJ.secret.sig".to_string() };
        assert!(!format!("{:?}", logged_in).contains("eyJ.secret.sig"));
    }
}

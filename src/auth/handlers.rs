//! Authentication API handlers
//!
//! Requests are validated here before they reach `AuthService`; the outcome is
//! wrapped in the `BaseResponse` envelope and the HTTP status mirrors its code.

use crate::api::handlers::AppState;
use crate::auth::models::{
    BaseResponse, LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse,
};
use crate::auth::outcome::{AuthOutcome, LoggedIn, LoggedOut, Registered, Rejection};
use crate::core::error::Result;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

/// Handler for POST /api/auth/register - User registration
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(email = %req.email, "User registration attempt");

    let violations = req.validate();
    let outcome = if violations.is_empty() {
        state.auth_service.register(&req).await?
    } else {
        AuthOutcome::Rejected(Rejection::Validation(violations))
    };

    let base = BaseResponse::from_outcome(&outcome, Registered::MESSAGE);
    Ok((status_of(&base), Json(RegisterResponse { base })))
}

/// Handler for POST /api/auth/login - User login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(email = %req.email, "Login attempt");

    let violations = req.validate();
    let outcome = if violations.is_empty() {
        state.auth_service.login(&req).await?
    } else {
        AuthOutcome::Rejected(Rejection::Validation(violations))
    };

    let base = BaseResponse::from_outcome(&outcome, LoggedIn::MESSAGE);
    let access_token = outcome
        .accepted()
        .map(|logged_in| logged_in.access_token)
        .unwrap_or_default();

    Ok((status_of(&base), Json(LoginResponse { base, access_token })))
}

/// Handler for POST /api/auth/logout - Revoke the presented bearer token
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let outcome = state.auth_service.logout(&headers).await?;

    let base = BaseResponse::from_outcome(&outcome, LoggedOut::MESSAGE);
    Ok((status_of(&base), Json(LogoutResponse { base })))
}

fn status_of(base: &BaseResponse) -> StatusCode {
    StatusCode::from_u16(base.code).unwrap_or(StatusCode::OK)
}

//! Admin session endpoints.
//!
//! Exposes endpoints for:
//! - Logging in with the admin password (sets the session cookie)
//! - Logging out (clears the session cookie)
//! - Checking whether the caller holds a valid session

use crate::admin::gate::AdminGate;
use crate::admin::middleware::AdminSession;
use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Login request body.
///
/// Deliberately not `Debug`: the password must never reach a log line.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Response for login endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub expires_at: String,
}

/// Response for logout endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Response for verify endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

/// Response for session endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub issued_at: Option<String>,
    pub expires_at: Option<String>,
}

/// Handler: POST /login
///
/// Checks the password and, on success, sets the session cookie.
async fn login(
    State(gate): State<Arc<AdminGate>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;

    // bcrypt is slow on purpose; keep it off the async workers
    let verifier = gate.verifier().clone();
    let matched = tokio::task::spawn_blocking(move || verifier.verify_password(&request.password))
        .await
        .unwrap_or(false);

    if !matched {
        warn!("Admin login rejected");
        return Err(AppError::InvalidCredentials);
    }

    let session = gate.issue_session()?;
    let cookie = gate
        .session_cookie(&session)
        .ok_or_else(|| AppError::internal("Failed to build session cookie"))?;

    info!("Admin login succeeded, session expires at {}", session.expires_at);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            expires_at: session.expires_at.to_rfc3339(),
        }),
    )
        .into_response())
}

/// Handler: POST /logout
///
/// Clears the session cookie. Tokens are stateless, so nothing else to undo.
async fn logout(State(gate): State<Arc<AdminGate>>) -> Result<Response, AppError> {
    let cookie = gate
        .clear_cookie()
        .ok_or_else(|| AppError::internal("Failed to build session cookie"))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse { success: true }),
    )
        .into_response())
}

/// Handler: GET /verify
///
/// Reports whether the caller's session is valid. Never rejects.
async fn verify(State(gate): State<Arc<AdminGate>>, headers: HeaderMap) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: gate.authorize(&headers).is_some(),
    })
}

/// Handler: GET /session
async fn session(AdminSession(claims): AdminSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: true,
        issued_at: claims.issued_at().map(|t| t.to_rfc3339()),
        expires_at: claims.expires_at().map(|t| t.to_rfc3339()),
    })
}

/// Create the admin router.
pub fn admin_router(gate: Arc<AdminGate>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify", get(verify))
        .route("/session", get(session))
        .with_state(gate)
}

//! Route enforcement for the admin area.
//!
//! `require_admin` runs in front of every route and rejects requests to
//! protected paths that do not carry a valid session. `AdminSession` applies
//! the same predicate per handler for routes that live outside the protected
//! prefixes.

use crate::admin::gate::AdminGate;
use crate::admin::token::AdminClaims;
use crate::error::AppError;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Middleware enforcing an admin session on protected paths.
///
/// On success the decoded claims are attached as a request extension and the
/// request is otherwise forwarded unchanged.
pub async fn require_admin(
    State(gate): State<Arc<AdminGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !gate.is_protected(request.uri().path()) {
        return next.run(request).await;
    }

    match gate.authorize(request.headers()) {
        Some(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        None => {
            debug!("Unauthorized request to {}", request.uri().path());
            AppError::AuthRequired.into_response()
        }
    }
}

/// Extractor yielding the claims of a valid admin session.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminClaims);

impl<S> FromRequestParts<S> for AdminSession
where
    Arc<AdminGate>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already checked by `require_admin` on this request
        if let Some(claims) = parts.extensions.get::<AdminClaims>() {
            return Ok(Self(claims.clone()));
        }

        let gate = Arc::<AdminGate>::from_ref(state);
        gate.authorize(&parts.headers)
            .map(Self)
            .ok_or(AppError::AuthRequired)
    }
}

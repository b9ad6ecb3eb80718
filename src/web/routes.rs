use crate::admin::{self, AdminGate};
use crate::config::WebConfig;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn cors_layer(web: &WebConfig) -> CorsLayer {
    if web.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = web
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // Cookie-carrying requests need explicit origins, methods and headers
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Create the web router.
///
/// The admin enforcer wraps every route so any path under a protected prefix
/// is rejected without a valid session, whichever handler would serve it.
pub fn create_router(web: &WebConfig, gate: Arc<AdminGate>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/admin", admin::admin_router(gate.clone()))
        .layer(middleware::from_fn_with_state(gate, admin::require_admin))
        .layer(cors_layer(web))
        .layer(TraceLayer::new_for_http())
}

//! Admin gate for the moderation area of the site.
//!
//! ## Security Model
//!
//! - The admin password is checked against a bcrypt hash from configuration
//! - A successful login mints a signed, time-limited session token (HS256 JWT)
//! - The token travels in an `HttpOnly` cookie; nothing is stored server-side
//! - Every check fails closed: missing secrets, malformed input and internal
//!   faults all read as "not authorized"
//!
//! ## Usage
//!
//! ```ignore
//! let gate = Arc::new(AdminGate::from_config(&config.admin));
//!
//! let app = Router::new()
//!     .nest("/api/admin", admin::admin_router(gate.clone()))
//!     .layer(axum::middleware::from_fn_with_state(gate, admin::require_admin));
//! ```

pub mod gate;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod token;

pub use gate::{AdminGate, IssuedSession};
pub use middleware::{require_admin, AdminSession};
pub use password::{hash_password, CredentialVerifier};
pub use routes::admin_router;
pub use token::{AdminClaims, TokenIssuer, ADMIN_SUBJECT};

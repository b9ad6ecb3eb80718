use thiserror::Error;

/// Errors raised inside the admin gate.
///
/// These never carry secret material or submitted passwords.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token signing secret is not configured")]
    MissingSecret,

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token encoding failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("Password exceeds {max} bytes")]
    PasswordTooLong { max: usize },
}

/// Application-wide error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Admin gate error: {0}")]
    Auth(#[from] AuthError),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] axum::extract::rejection::JsonRejection),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert AppError to HTTP status codes for web responses
impl AppError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Auth(AuthError::MissingSecret) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest(rejection) => rejection.status(),
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16()
        });
        (status, axum::Json(body)).into_response()
    }
}

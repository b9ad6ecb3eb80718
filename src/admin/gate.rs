//! The admin gate: credential check, session minting and the single
//! authorization predicate shared by the route enforcer and handlers.

use crate::admin::password::CredentialVerifier;
use crate::admin::token::{self, AdminClaims, TokenIssuer};
use crate::config::AdminConfig;
use crate::error::AuthError;
use axum::http::{header, HeaderMap, HeaderValue};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use tracing::warn;

/// A freshly minted admin session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Composes the credential verifier and token issuer with the cookie and
/// path policy from configuration.
#[derive(Debug, Clone)]
pub struct AdminGate {
    verifier: CredentialVerifier,
    issuer: TokenIssuer,
    cookie_name: String,
    cookie_secure: bool,
    protected_prefixes: Vec<String>,
    public_paths: Vec<String>,
}

impl AdminGate {
    /// Build the gate from configuration, warning once about missing secrets.
    pub fn from_config(config: &AdminConfig) -> Self {
        let verifier = CredentialVerifier::new(config.password_hash.as_deref());
        if !(1..=token::MAX_TTL_HOURS).contains(&config.token_ttl_hours) {
            warn!(
                "Admin token_ttl_hours {} outside 1..={}; clamping",
                config.token_ttl_hours,
                token::MAX_TTL_HOURS
            );
        }
        let issuer = TokenIssuer::new(
            config.token_secret.as_deref(),
            token::ttl_from_hours(config.token_ttl_hours),
        );

        if !verifier.is_configured() {
            warn!("Admin password hash not configured; all admin logins will be rejected");
        }
        if !issuer.is_configured() {
            warn!("Admin token secret not configured; all admin sessions will be rejected");
        }

        Self {
            verifier,
            issuer,
            cookie_name: config.cookie_name.clone(),
            cookie_secure: config.cookie_secure,
            protected_prefixes: config.protected_prefixes.clone(),
            public_paths: config.public_paths.clone(),
        }
    }

    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Mint a new session token.
    pub fn issue_session(&self) -> Result<IssuedSession, AuthError> {
        let issued_at = Utc::now();
        let token = self.issuer.issue_at(issued_at)?;
        Ok(IssuedSession {
            token,
            expires_at: self.issuer.expiry_for(issued_at)?,
        })
    }

    /// Pull the session token out of a request: the session cookie first,
    /// then an `Authorization: Bearer` header.
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(&self.cookie_name) {
            if !cookie.value().is_empty() {
                return Some(cookie.value().to_string());
            }
        }

        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        Some(token.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// The authorization predicate: claims for a valid session, None otherwise.
    pub fn authorize(&self, headers: &HeaderMap) -> Option<AdminClaims> {
        let token = self.token_from_headers(headers)?;
        self.issuer.decode(&token)
    }

    /// Whether `path` sits under a protected prefix and is not explicitly public.
    pub fn is_protected(&self, path: &str) -> bool {
        if self.public_paths.iter().any(|p| p == path) {
            return false;
        }
        self.protected_prefixes
            .iter()
            .any(|prefix| path_has_prefix(path, prefix))
    }

    /// `Set-Cookie` value carrying a session token.
    pub fn session_cookie(&self, session: &IssuedSession) -> Option<HeaderValue> {
        let max_age = self.issuer.ttl().num_seconds();
        let secure = if self.cookie_secure { "; Secure" } else { "" };
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age}{secure}",
            self.cookie_name, session.token
        );
        HeaderValue::from_str(&cookie).ok()
    }

    /// `Set-Cookie` value that clears the session cookie.
    pub fn clear_cookie(&self) -> Option<HeaderValue> {
        let secure = if self.cookie_secure { "; Secure" } else { "" };
        let cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0{secure}",
            self.cookie_name
        );
        HeaderValue::from_str(&cookie).ok()
    }
}

/// Segment-aware prefix match: `/admin` covers `/admin` and `/admin/x` but
/// not `/administrator`.
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

//! Signed, time-limited admin session tokens.
//!
//! Tokens are HS256 JWTs carrying the issuance time, the expiry and a random
//! token id. Nothing is stored server-side: a token is valid exactly when its
//! signature checks out against the current secret and its expiry is still in
//! the future.

use crate::error::AuthError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Subject claim carried by every admin token.
pub const ADMIN_SUBJECT: &str = "admin";

/// Longest session lifetime the gate will issue.
pub const MAX_TTL_HOURS: i64 = 24 * 365;

/// Session lifetime for a configured hour count, clamped to `0..=MAX_TTL_HOURS`.
pub fn ttl_from_hours(hours: i64) -> Duration {
    Duration::hours(hours.clamp(0, MAX_TTL_HOURS))
}

/// Claims embedded in an admin session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    /// Random token id
    pub jti: String,
}

impl AdminClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies admin session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Option<Arc<SigningKeys>>,
    ttl: Duration,
    validation: Validation,
}

impl TokenIssuer {
    /// Create an issuer. A missing or blank secret yields an issuer that
    /// refuses to mint and rejects every token.
    pub fn new(secret: Option<&str>, ttl: Duration) -> Self {
        let keys = secret.filter(|s| !s.trim().is_empty()).map(|s| {
            Arc::new(SigningKeys {
                encoding: EncodingKey::from_secret(s.as_bytes()),
                decoding: DecodingKey::from_secret(s.as_bytes()),
            })
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.sub = Some(ADMIN_SUBJECT.to_string());

        Self {
            keys,
            ttl,
            validation,
        }
    }

    /// Whether a signing secret is configured.
    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Validity window applied to newly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token issued now.
    pub fn generate_token(&self) -> Result<String, AuthError> {
        self.issue_at(Utc::now())
    }

    /// Expiry of a token issued at `issued_at`.
    pub fn expiry_for(&self, issued_at: DateTime<Utc>) -> Result<DateTime<Utc>, AuthError> {
        issued_at
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOutOfRange)
    }

    /// Mint a token with an explicit issuance time.
    pub fn issue_at(&self, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::MissingSecret)?;
        let expires_at = self.expiry_for(issued_at)?;
        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)?)
    }

    /// Decode and validate a token, returning its claims when it is
    /// authentic and unexpired.
    pub fn decode(&self, token: &str) -> Option<AdminClaims> {
        let keys = self.keys.as_ref()?;
        if token.is_empty() {
            return None;
        }
        match decode::<AdminClaims>(token, &keys.decoding, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Rejected admin token: {:?}", e.kind());
                None
            }
        }
    }

    /// Returns true iff the token is authentic and unexpired.
    pub fn verify_token(&self, token: &str) -> bool {
        self.decode(token).is_some()
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("configured", &self.is_configured())
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "test-secret-key-for-testing-purposes";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(Some(SECRET), Duration::hours(24))
    }

    #[test]
    fn test_generate_and_verify() {
        let issuer = issuer();
        let token = issuer.generate_token().unwrap();

        assert!(issuer.verify_token(&token));
        assert!(!issuer.verify_token("invalid-token"));
        assert!(!issuer.verify_token(""));
    }

    #[test]
    fn test_claims_shape() {
        let issuer = issuer();
        let issued_at = Utc::now();
        let token = issuer.issue_at(issued_at).unwrap();
        let claims = issuer.decode(&token).unwrap();

        assert_eq!(claims.sub, ADMIN_SUBJECT);
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp - claims.iat, Duration::hours(24).num_seconds());
        assert!(!claims.jti.is_empty());
        assert_eq!(claims.expires_at().unwrap().timestamp(), claims.exp);
    }

    #[test]
    fn test_tokens_are_unique() {
        let issuer = issuer();
        let a = issuer.generate_token().unwrap();
        let b = issuer.generate_token().unwrap();
        assert_ne!(a, b);
        assert_ne!(issuer.decode(&a).unwrap().jti, issuer.decode(&b).unwrap().jti);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let stale = issuer.issue_at(Utc::now() - Duration::hours(25)).unwrap();
        assert!(!issuer.verify_token(&stale));

        let nearly_stale = issuer.issue_at(Utc::now() - Duration::hours(23)).unwrap();
        assert!(issuer.verify_token(&nearly_stale));
    }

    #[test]
    fn test_verification_is_idempotent() {
        let issuer = issuer();
        let token = issuer.generate_token().unwrap();
        for _ in 0..5 {
            assert!(issuer.verify_token(&token));
        }
        for _ in 0..5 {
            assert!(!issuer.verify_token("invalid-token"));
        }
    }

    #[test]
    fn test_rotated_secret_invalidates_tokens() {
        let old = issuer();
        let token = old.generate_token().unwrap();

        let rotated = TokenIssuer::new(Some("a-completely-different-secret"), Duration::hours(24));
        assert!(!rotated.verify_token(&token));
        assert!(old.verify_token(&token));
    }

    #[test]
    fn test_spliced_token_rejected() {
        let issuer = issuer();
        let a = issuer.generate_token().unwrap();
        let b = issuer.generate_token().unwrap();

        let a_parts: Vec<&str> = a.split('.').collect();
        let b_parts: Vec<&str> = b.split('.').collect();
        assert_eq!(a_parts.len(), 3);

        // a's header and signature around b's payload
        let spliced = format!("{}.{}.{}", a_parts[0], b_parts[1], a_parts[2]);
        assert!(!issuer.verify_token(&spliced));
    }

    #[test]
    fn test_missing_secret_fails_closed() {
        let unconfigured = TokenIssuer::new(None, Duration::hours(24));
        assert!(!unconfigured.is_configured());
        assert!(matches!(
            unconfigured.generate_token(),
            Err(AuthError::MissingSecret)
        ));

        let token = issuer().generate_token().unwrap();
        assert!(!unconfigured.verify_token(&token));

        let blank = TokenIssuer::new(Some(""), Duration::hours(24));
        assert!(!blank.is_configured());
        assert!(!blank.verify_token(&token));
    }

    #[test]
    fn test_ttl_from_hours_clamps() {
        assert_eq!(ttl_from_hours(24), Duration::hours(24));
        assert_eq!(ttl_from_hours(-5), Duration::zero());
        assert_eq!(ttl_from_hours(i64::MAX), Duration::hours(MAX_TTL_HOURS));
        assert_eq!(ttl_from_hours(100_000_000_000), Duration::hours(MAX_TTL_HOURS));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let issuer = issuer();
        let result = issuer.issue_at(DateTime::<Utc>::MAX_UTC);
        assert!(matches!(result, Err(AuthError::ExpiryOutOfRange)));
        assert!(matches!(
            issuer.expiry_for(DateTime::<Utc>::MAX_UTC),
            Err(AuthError::ExpiryOutOfRange)
        ));

        let longest = TokenIssuer::new(Some(SECRET), ttl_from_hours(i64::MAX));
        let token = longest.generate_token().unwrap();
        assert!(longest.verify_token(&token));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", issuer());
        assert!(!rendered.contains(SECRET));
    }

    proptest! {
        #[test]
        fn prop_arbitrary_strings_rejected(s in ".{0,200}") {
            prop_assert!(!issuer().verify_token(&s));
        }

        #[test]
        fn prop_jwt_shaped_garbage_rejected(
            h in "[A-Za-z0-9_-]{1,60}",
            p in "[A-Za-z0-9_-]{1,120}",
            sig in "[A-Za-z0-9_-]{1,60}",
        ) {
            let candidate = format!("{h}.{p}.{sig}");
            prop_assert!(!issuer().verify_token(&candidate));
        }
    }
}

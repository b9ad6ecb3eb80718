//! Admin password verification against a configured bcrypt hash.

use crate::error::AuthError;
use zeroize::Zeroizing;

/// bcrypt reads only this many bytes of a password; longer ones are refused
/// so two passwords sharing a 72-byte prefix cannot both match.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Checks submitted passwords against the stored admin hash.
///
/// Holds only the hash, never a plaintext password. A verifier built without a
/// hash rejects every password.
#[derive(Clone)]
pub struct CredentialVerifier {
    password_hash: Option<Zeroizing<String>>,
}

impl CredentialVerifier {
    /// Create a verifier from an optional bcrypt hash.
    pub fn new(password_hash: Option<&str>) -> Self {
        let password_hash = password_hash
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| Zeroizing::new(h.to_string()));
        Self { password_hash }
    }

    /// Whether a password hash is configured at all.
    pub fn is_configured(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Returns true iff `plaintext` matches the configured hash.
    ///
    /// A missing or malformed hash and any bcrypt fault all yield false.
    pub fn verify_password(&self, plaintext: &str) -> bool {
        let Some(hash) = self.password_hash.as_deref() else {
            return false;
        };
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, AuthError> {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::PasswordTooLong {
            max: MAX_PASSWORD_BYTES,
        });
    }
    Ok(bcrypt::hash(plaintext, cost)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Lowest cost bcrypt accepts; keeps the suite fast.
    const TEST_COST: u32 = 4;

    fn verifier_for(password: &str) -> CredentialVerifier {
        let hash = hash_password(password, TEST_COST).unwrap();
        CredentialVerifier::new(Some(&hash))
    }

    #[test]
    fn test_password_verification() {
        let verifier = verifier_for("testpassword");

        assert!(verifier.verify_password("testpassword"));
        assert!(!verifier.verify_password("wrongpassword"));
        assert!(!verifier.verify_password(""));
    }

    #[test]
    fn test_hash_differs_from_password() {
        let hash = hash_password("testpassword", TEST_COST).unwrap();
        assert_ne!(hash, "testpassword");
        assert!(hash.starts_with("$2"));

        // Salted: same input hashes differently each time
        let again = hash_password("testpassword", TEST_COST).unwrap();
        assert_ne!(hash, again);
    }

    #[test]
    fn test_missing_hash_fails_closed() {
        let verifier = CredentialVerifier::new(None);
        assert!(!verifier.is_configured());
        assert!(!verifier.verify_password("testpassword"));
        assert!(!verifier.verify_password(""));

        let blank = CredentialVerifier::new(Some("   "));
        assert!(!blank.is_configured());
        assert!(!blank.verify_password(""));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        let verifier = CredentialVerifier::new(Some("not-a-bcrypt-hash"));
        assert!(verifier.is_configured());
        assert!(!verifier.verify_password("not-a-bcrypt-hash"));
        assert!(!verifier.verify_password("testpassword"));
    }

    #[test]
    fn test_long_passwords() {
        let longest = "p".repeat(MAX_PASSWORD_BYTES);
        let verifier = verifier_for(&longest);
        assert!(verifier.verify_password(&longest));

        // Same first 72 bytes, different tail
        let extended = format!("{longest}-and-more");
        assert!(!verifier.verify_password(&extended));

        assert!(matches!(
            hash_password(&extended, TEST_COST),
            Err(AuthError::PasswordTooLong { max: MAX_PASSWORD_BYTES })
        ));
    }

    #[test]
    fn test_debug_hides_hash() {
        let hash = hash_password("testpassword", TEST_COST).unwrap();
        let verifier = CredentialVerifier::new(Some(&hash));
        let rendered = format!("{:?}", verifier);
        assert!(!rendered.contains(&hash));
        assert!(rendered.contains("configured: true"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_only_the_configured_password_matches(other in "[ -~]{0,40}") {
            let verifier = verifier_for("testpassword");
            prop_assume!(other != "testpassword");
            prop_assert!(!verifier.verify_password(&other));
        }
    }
}

use anyhow::bail;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use zeroize::Zeroizing;

/// 384 bits, comfortably above the HS256 key size.
pub const DEFAULT_SECRET_BYTES: usize = 48;

/// Minimum accepted secret length in bytes.
const MIN_SECRET_BYTES: usize = 32;

/// Generate a random signing secret from OS entropy, base64 encoded.
pub fn generate_secret(bytes: usize) -> anyhow::Result<Zeroizing<String>> {
    if bytes < MIN_SECRET_BYTES {
        bail!("Secret must be at least {} bytes", MIN_SECRET_BYTES);
    }
    let mut entropy = Zeroizing::new(vec![0u8; bytes]);
    rand::thread_rng().fill_bytes(&mut entropy);
    Ok(Zeroizing::new(BASE64.encode(&*entropy)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret() {
        let a = generate_secret(DEFAULT_SECRET_BYTES).unwrap();
        let b = generate_secret(DEFAULT_SECRET_BYTES).unwrap();
        assert_ne!(*a, *b);

        let decoded = BASE64.decode(a.as_bytes()).unwrap();
        assert_eq!(decoded.len(), DEFAULT_SECRET_BYTES);
    }

    #[test]
    fn test_rejects_short_secret() {
        assert!(generate_secret(8).is_err());
    }
}

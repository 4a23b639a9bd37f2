use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate the raw reset secret sent to the user: 32 random bytes,
/// base64url without padding so it survives a URL path segment.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a reset secret for storage and lookup. Plain SHA-256, no extra
/// salt: the secret itself is 256 bits of entropy and short-lived.
pub fn hash_secret(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        let raw = generate_secret();
        assert_eq!(hash_secret(&raw), hash_secret(&raw));
    }

    #[test]
    fn hash_is_hex_and_differs_from_raw() {
        let raw = generate_secret();
        let hashed = hash_secret(&raw);
        assert_eq!(hashed.len(), 64);
        assert!(hashed.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hashed, raw);
    }

    #[test]
    fn secrets_are_unique_and_url_safe() {
        let a = generate_secret();
        let b = generate_secret();
        assert_ne!(a, b);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hash a password on the blocking pool. Argon2 is CPU-bound; running it
/// inline would stall the async worker for the whole derivation.
pub async fn hash(plain: String) -> anyhow::Result<String> {
    Ok(tokio::task::spawn_blocking(move || hash_sync(&plain)).await??)
}

/// Verify a password against a stored hash on the blocking pool.
pub async fn verify(plain: String, hash: String) -> anyhow::Result<bool> {
    Ok(tokio::task::spawn_blocking(move || verify_sync(&plain, &hash)).await??)
}

fn hash_sync(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

fn verify_sync(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hashed = hash_sync(password).expect("hashing should succeed");
        assert_ne!(hashed, password);
        assert!(verify_sync(password, &hashed).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hashed = hash_sync(password).expect("hashing should succeed");
        assert!(!verify_sync("wrong-password", &hashed).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_sync("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn async_wrappers_roundtrip() {
        let hashed = hash("pomodoro123".into()).await.expect("hash");
        assert!(verify("pomodoro123".into(), hashed.clone()).await.expect("verify"));
        assert!(!verify("pomodoro124".into(), hashed).await.expect("verify"));
    }
}

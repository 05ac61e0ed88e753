use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
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

    const PASSWORD: &str = "moody-sunrise-1984";

    #[test]
    fn stored_hash_verifies_the_original_password() {
        let hash = hash_password(PASSWORD).expect("hash");
        assert!(verify_password(PASSWORD, &hash).expect("verify"));
        // The plaintext itself never appears in the stored form.
        assert!(!hash.contains(PASSWORD));
    }

    #[test]
    fn near_miss_passwords_do_not_verify() {
        let hash = hash_password(PASSWORD).expect("hash");
        assert!(!verify_password("moody-sunrise-1985", &hash).expect("verify"));
        assert!(!verify_password("", &hash).expect("verify"));
    }

    #[test]
    fn salting_keeps_equal_passwords_distinct() {
        let first = hash_password(PASSWORD).expect("hash");
        let second = hash_password(PASSWORD).expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn a_plaintext_column_value_is_an_error_not_a_match() {
        // Simulates a row whose password_hash was never actually hashed.
        assert!(verify_password(PASSWORD, PASSWORD).is_err());
    }
}

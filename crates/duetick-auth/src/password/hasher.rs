//! Argon2id password hashing.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher as _};
use duetick_core::{AppError, AppResult};

/// Hashes and verifies passwords with Argon2id and per-password salts.
///
/// OAuth-only accounts have no password hash at all; callers decide how to
/// treat those before reaching for this type.
#[derive(Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes a plaintext password into a PHC string.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`; only malformed stored hashes are errors.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AppError::internal(format!("Malformed password hash: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct horse battery staple").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher
            .verify_password("correct horse battery staple", &hash)
            .unwrap());
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("s3cret-passphrase").unwrap();

        assert!(!hasher.verify_password("wrong-guess", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let hasher = PasswordHasher::new();
        assert!(hasher.verify_password("whatever", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_same_password_distinct_salts() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash_password("repeated").unwrap();
        let b = hasher.hash_password("repeated").unwrap();
        assert_ne!(a, b);
    }
}

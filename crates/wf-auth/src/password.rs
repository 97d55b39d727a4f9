//! Argon2id password hashing.
//!
//! Hashes are stored in PHC string format, so verification reads the
//! parameters back out of the hash itself.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::InvalidHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pass1234").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pass1234", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let h1 = hash_password("pass1234").unwrap();
        let h2 = hash_password("pass1234").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(verify_password("pass1234", "not-a-hash").is_err());
    }
}

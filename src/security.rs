//! Password hashing and session tokens

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes in a session token before hex encoding
const SESSION_TOKEN_BYTES: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hash a password into an Argon2id PHC string with a fresh salt
pub fn hash_password(password: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SecurityError::Hashing(e.to_string()))
}

/// Check a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch. A hash that cannot be parsed is an error,
/// not a mismatch.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, SecurityError> {
    let parsed = PasswordHash::new(hashed_password)
        .map_err(|e| SecurityError::MalformedHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(SecurityError::MalformedHash(e.to_string())),
    }
}

/// New opaque cookie value
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest stored in place of the raw token
pub fn hash_session_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("correct-horse").unwrap();

        assert_ne!(hash, "correct-horse");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("battery-staple", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let first = hash_password("correct-horse").unwrap();
        let second = hash_password("correct-horse").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let result = verify_password("anything", "not-a-phc-string");
        assert!(matches!(result, Err(SecurityError::MalformedHash(_))));
    }

    #[test]
    fn test_session_tokens() {
        let token = generate_session_token();
        assert_eq!(token.len(), SESSION_TOKEN_BYTES * 2);
        assert_ne!(token, generate_session_token());

        let digest = hash_session_token(&token);
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_session_token(&token));
        assert_ne!(digest, token);
    }
}

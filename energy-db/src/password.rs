//! One-way password hashing with Argon2id.
//!
//! Output is a PHC string (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! carrying its own random salt and parameters, safe to store verbatim.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
        rand_core::OsRng,
    },
};
use thiserror::Error;

/// Memory cost in KiB.
pub const MEMORY_COST_KIB: u32 = 19 * 1024;
/// Number of passes over memory.
pub const TIME_COST: u32 = 2;
pub const PARALLELISM: u32 = 1;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("invalid hashing parameters: {0}")]
    Params(argon2::Error),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),

    #[error("password hashing failed: {0}")]
    Hashing(password_hash::Error),
}

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Result<Self, PasswordError> {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .map_err(PasswordError::Params)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(PasswordError::Hashing)?;
        Ok(hash.to_string())
    }

    /// Returns `Ok(false)` on a mismatch; errors are reserved for hashes that
    /// cannot be parsed or evaluated.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(PasswordError::MalformedHash)?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hashing(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hasher = PasswordHasher::new().unwrap();
        let hash = hasher.hash("secret123").unwrap();
        assert_ne!(hash, "secret123");
        assert!(!hash.contains("secret123"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new().unwrap();
        let first = hasher.hash("secret123").unwrap();
        let second = hasher.hash("secret123").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("secret123", &first).unwrap());
        assert!(hasher.verify("secret123", &second).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hasher = PasswordHasher::new().unwrap();
        let hash = hasher.hash("secret123").unwrap();
        assert!(!hasher.verify("secret124", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_work_factor_is_embedded() {
        let hasher = PasswordHasher::new().unwrap();
        let hash = hasher.hash("pw").unwrap();
        assert!(hash.contains(&format!("m={MEMORY_COST_KIB},t={TIME_COST},p={PARALLELISM}")));
    }

    #[test]
    fn test_verify_malformed_hash() {
        let hasher = PasswordHasher::new().unwrap();
        let result = hasher.verify("secret123", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }
}

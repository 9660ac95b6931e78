//! Password hashing capability: one-way hash in, comparison-only out.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("stored hash is not a valid PHC string: {0}")]
    InvalidStoredHash(argon2::password_hash::Error),
    #[error("password verification failed: {0}")]
    Verify(argon2::password_hash::Error),
}

/// Hashes a plain password into a salted PHC string. The plain value is
/// never recoverable from the result.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

/// Compares a candidate against a stored PHC hash. A mismatch is
/// `Ok(false)`; only a structurally broken hash or an argon2 failure is an
/// error.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(PasswordError::InvalidStoredHash)?;

    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(other) => Err(PasswordError::Verify(other)),
    }
}

//! Password hashing with Argon2id.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

impl PasswordError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HashError(_) => "PASSWORD_HASH_FAILED",
            Self::VerifyError(_) => "PASSWORD_VERIFY_FAILED",
            Self::InvalidHash => "INVALID_PASSWORD_HASH",
        }
    }
}

/// Hashes a password into a PHC string with a random salt.
///
/// ```
/// use gestion_core::auth::hash_password;
///
/// let hash = hash_password("s3creto").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks a password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`; only malformed hashes and internal
/// failures are errors.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("clave-segura").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("clave-segura", &hash).unwrap());
        assert!(!verify_password("otra-clave", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let first = hash_password("admin").unwrap();
        let second = hash_password("admin").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_bcrypt_style_hash_is_rejected() {
        let result = verify_password("admin", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
        assert_eq!(PasswordError::InvalidHash.error_code(), "INVALID_PASSWORD_HASH");
    }
}

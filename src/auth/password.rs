/// Password Hashing and Verification
///
/// bcrypt with the library's default cost. Hashes carry their own salt.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, ValidationError};

// bcrypt only looks at the first 72 bytes
const MAX_PASSWORD_LENGTH: usize = 72;

/// Hash a password using bcrypt
///
/// Any password bcrypt accepts is hashed, the empty one included.
///
/// # Errors
/// Returns error if the password is over 72 bytes, or if bcrypt fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(
            ValidationError::TooLong("password".to_string(), MAX_PASSWORD_LENGTH).into(),
        );
    }

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a password against a stored hash
///
/// A mismatch is `Ok(false)`; only a malformed hash is an error.
pub fn check_password_hash(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

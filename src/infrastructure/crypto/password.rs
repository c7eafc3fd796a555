//! bcrypt password hashing

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a clear-text password at the default bcrypt cost.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a clear-text password against a stored bcrypt hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, BcryptError> {
    verify(password, stored_hash)
}

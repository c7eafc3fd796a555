//! User domain entity

/// Registered user account.
///
/// Only validated accounts may create reservations; the scheduler trusts
/// `is_validated` as resolved by the auth service.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Login email, unique across users
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Pending validation code, cleared once the account is validated
    pub validation_code: Option<String>,
    /// Whether the account has been validated
    pub is_validated: bool,
}

impl User {
    pub fn new(id: i64, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            validation_code: None,
            is_validated: false,
        }
    }

    /// Mark the account validated and drop the code
    pub fn validate(&mut self) {
        self.is_validated = true;
        self.validation_code = None;
    }
}

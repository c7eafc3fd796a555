//! Auth DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;

/// Request to register a new account
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request to validate an account with the issued code
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateAccountRequest {
    pub email: String,
    pub code: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User details in API responses. Never carries the password hash
/// or the validation code.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub is_validated: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_validated: user.is_validated,
        }
    }
}

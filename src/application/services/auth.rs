//! Account registration, validation and login

use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, User};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::Storage;

/// Manages user accounts. The reservation ledger trusts the
/// `is_validated` flag this service resolves.
pub struct AuthService {
    storage: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Register a new account. The account starts unvalidated with a
    /// generated validation code.
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("invalid email".into()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("password must not be empty".into()));
        }
        if self.storage.get_user_by_email(email).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!("email {email}")));
        }

        let password_hash =
            hash_password(password).map_err(|e| DomainError::Storage(format!("bcrypt: {e}")))?;

        let id = self.storage.next_user_id().await;
        let mut user = User::new(id, email, password_hash);
        let code = Self::generate_code();
        user.validation_code = Some(code.clone());
        self.storage.save_user(user.clone()).await?;

        // No mail delivery in this deployment; the code is surfaced in the logs.
        info!("User {} registered, validation code: {}", email, code);
        Ok(user)
    }

    /// Validate an account with the code issued at registration.
    pub async fn validate_account(&self, email: &str, code: &str) -> DomainResult<()> {
        let mut user = self
            .storage
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| DomainError::Validation(format!("unknown account {email}")))?;
        if user.is_validated {
            return Err(DomainError::Validation(format!(
                "account {email} is already validated"
            )));
        }
        if user.validation_code.as_deref() != Some(code) {
            return Err(DomainError::Validation("invalid validation code".into()));
        }

        user.validate();
        self.storage.update_user(user).await?;
        info!("Account {} validated", email);
        Ok(())
    }

    /// Authenticate a validated account.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<User> {
        let user = self
            .storage
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("invalid credentials".into()))?;
        if !user.is_validated {
            return Err(DomainError::Unauthorized("account not validated".into()));
        }
        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| DomainError::Storage(format!("bcrypt: {e}")))?;
        if !ok {
            return Err(DomainError::Unauthorized("invalid credentials".into()));
        }

        info!("User {} logged in", email);
        Ok(user)
    }

    fn generate_code() -> String {
        let mut code = Uuid::new_v4().simple().to_string();
        code.truncate(8);
        code
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStorage;

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn register_issues_validation_code() {
        let auth = service();
        let user = auth.register("marie@example.fr", "s3cret").await.unwrap();
        assert!(!user.is_validated);
        assert!(user.validation_code.is_some());
        // Clear password is never stored
        assert_ne!(user.password_hash, "s3cret");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = service();
        auth.register("marie@example.fr", "s3cret").await.unwrap();
        assert!(matches!(
            auth.register("marie@example.fr", "other").await,
            Err(DomainError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn malformed_registration_is_rejected() {
        let auth = service();
        assert!(auth.register("", "pw").await.is_err());
        assert!(auth.register("no-at-sign", "pw").await.is_err());
        assert!(auth.register("a@b.fr", "").await.is_err());
    }

    #[tokio::test]
    async fn validation_then_login_flow() {
        let auth = service();
        let user = auth.register("marie@example.fr", "s3cret").await.unwrap();
        let code = user.validation_code.unwrap();

        // Login before validation fails
        assert!(matches!(
            auth.login("marie@example.fr", "s3cret").await,
            Err(DomainError::Unauthorized(_))
        ));

        assert!(auth.validate_account("marie@example.fr", "wrong").await.is_err());
        auth.validate_account("marie@example.fr", &code).await.unwrap();

        let logged_in = auth.login("marie@example.fr", "s3cret").await.unwrap();
        assert!(logged_in.is_validated);

        // Second validation attempt is rejected
        assert!(auth.validate_account("marie@example.fr", &code).await.is_err());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let auth = service();
        let user = auth.register("marie@example.fr", "s3cret").await.unwrap();
        auth.validate_account("marie@example.fr", &user.validation_code.unwrap())
            .await
            .unwrap();
        assert!(matches!(
            auth.login("marie@example.fr", "nope").await,
            Err(DomainError::Unauthorized(_))
        ));
    }
}

//! Credential validation with progressive lockout.

use std::sync::Arc;

use tracing::{info, warn};

use bibliotek_core::config::auth::AuthConfig;
use bibliotek_core::error::AppError;
use bibliotek_core::result::AppResult;
use bibliotek_database::repositories::UserRepository;
use bibliotek_entity::user::model::CreateUser;
use bibliotek_entity::user::{User, UserRole};

use crate::password::PasswordHasher;

/// The one message every failed login produces.
///
/// A missing account, a wrong password, and a locked account are all
/// indistinguishable to the caller.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Validates credentials and manages the failed-attempt lockout counter.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<UserRepository>,
    hasher: PasswordHasher,
    max_failed_attempts: i32,
    password_min_length: usize,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("max_failed_attempts", &self.max_failed_attempts)
            .finish()
    }
}

impl CredentialService {
    /// Creates a new credential service.
    pub fn new(users: Arc<UserRepository>, config: &AuthConfig) -> AppResult<Self> {
        Ok(Self {
            users,
            hasher: PasswordHasher::new(config)?,
            max_failed_attempts: config.max_failed_attempts,
            password_min_length: config.password_min_length,
        })
    }

    /// Registers a new account with the `user` role.
    pub async fn register(
        &self,
        name: &str,
        surname: &str,
        email: &str,
        password: &str,
        phone: Option<String>,
        address: Option<String>,
    ) -> AppResult<User> {
        self.create_account(name, surname, email, password, phone, address, UserRole::User)
            .await
    }

    /// Creates an account with an explicit role.
    ///
    /// Administrative path; the same password policy applies as for
    /// self-registration.
    pub async fn create_account(
        &self,
        name: &str,
        surname: &str,
        email: &str,
        password: &str,
        phone: Option<String>,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User> {
        if password.len() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                name: name.to_string(),
                surname: surname.to_string(),
                email: email.to_string(),
                password_hash,
                phone,
                address,
                role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "New account created");
        Ok(user)
    }

    /// Validates an email + password pair.
    ///
    /// On a wrong password the failure counter is incremented atomically;
    /// the account locks when the counter reaches the configured
    /// threshold. On success the counter resets and the last-access
    /// timestamp is stamped.
    pub async fn validate(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.users.find_login_candidate(email).await? else {
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            let (attempts, locked) = self
                .users
                .record_failed_attempt(user.id, self.max_failed_attempts)
                .await?;

            if locked {
                warn!(user_id = %user.id, attempts, "Account locked after repeated failures");
            } else {
                info!(user_id = %user.id, attempts, "Failed login attempt");
            }
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        self.users.record_successful_login(user.id).await?;
        Ok(user)
    }

    /// Hashes a password for account management flows.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        if password.len() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }
        self.hasher.hash_password(password)
    }
}

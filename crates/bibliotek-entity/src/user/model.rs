//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered library member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Email address (unique, login identifier).
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// User role (authorization).
    pub role: UserRole,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Number of consecutive failed login attempts.
    pub failed_login_attempts: i32,
    /// Whether the account is locked out of login.
    pub locked: bool,
    /// Last successful login time.
    pub last_access_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Phone number (optional).
    pub phone: Option<String>,
    /// Postal address (optional).
    pub address: Option<String>,
    /// Assigned role.
    pub role: UserRole,
}

/// Data for updating an existing user's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New first name.
    pub name: Option<String>,
    /// New last name.
    pub surname: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New postal address.
    pub address: Option<String>,
    /// New role (admin only).
    pub role: Option<UserRole>,
    /// Clear the lockout and reset the failure counter.
    pub unlock: Option<bool>,
}

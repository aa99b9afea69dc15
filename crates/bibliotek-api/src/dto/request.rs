//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bibliotek_core::types::pagination::PageRequest;
use bibliotek_entity::loan::LoanStatus;
use bibliotek_entity::user::UserRole;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// First name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Last name.
    #[validate(length(min = 1, max = 100, message = "Surname is required"))]
    pub surname: String,
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Admin user-creation request. Unlike registration, the caller chooses
/// the role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// First name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Last name.
    #[validate(length(min = 1, max = 100, message = "Surname is required"))]
    pub surname: String,
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Role for the new account. Defaults to `user`.
    pub role: Option<UserRole>,
}

/// Update user request (self or admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
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
    /// Clear the lockout (admin only).
    pub unlock: Option<bool>,
}

/// Create book request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookRequest {
    /// Title.
    #[validate(length(min = 1, max = 500, message = "Title is required"))]
    pub title: String,
    /// Author.
    #[validate(length(min = 1, max = 200, message = "Author is required"))]
    pub author: String,
    /// ISBN.
    pub isbn: Option<String>,
    /// Year of publication.
    pub publication_year: Option<i32>,
    /// Genre.
    pub genre: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Total copies owned.
    #[validate(range(min = 1, message = "At least one copy is required"))]
    pub total_copies: i32,
    /// Description.
    pub description: Option<String>,
}

/// Update book request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub total_copies: Option<i32>,
    pub description: Option<String>,
}

/// Create loan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoanRequest {
    /// The book to borrow.
    pub book_id: Uuid,
    /// The borrowing user. Only librarians and admins may set this to
    /// someone other than themselves.
    pub user_id: Option<Uuid>,
    /// Due date. Defaults to 30 days out.
    pub due_at: Option<DateTime<Utc>>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Book list query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookQuery {
    /// Search term matched against title, author, and genre.
    pub search: Option<String>,
    /// Pagination.
    #[serde(flatten, default)]
    pub page: PageParams,
}

/// Loan list query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanQuery {
    /// Filter by loan status.
    pub status: Option<LoanStatus>,
    /// Pagination.
    #[serde(flatten, default)]
    pub page: PageParams,
}

/// Plain pagination query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageParams {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    /// Convert into the domain page request, clamping out-of-range values.
    pub fn to_page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

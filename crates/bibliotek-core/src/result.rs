//! Application result alias.

use crate::error::AppError;

/// Convenient result alias used throughout the application.
pub type AppResult<T> = Result<T, AppError>;

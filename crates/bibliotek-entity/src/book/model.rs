//! Book entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A title in the library catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Unique book identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// ISBN (unique when present).
    pub isbn: Option<String>,
    /// Year of publication.
    pub publication_year: Option<i32>,
    /// Genre.
    pub genre: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Total copies owned.
    pub total_copies: i32,
    /// Copies currently available for loan.
    pub available_copies: i32,
    /// Free-form description.
    pub description: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Whether at least one copy can be loaned out right now.
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// Data required to add a book to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub total_copies: i32,
    pub description: Option<String>,
}

/// Data for updating a catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub total_copies: Option<i32>,
    pub description: Option<String>,
}

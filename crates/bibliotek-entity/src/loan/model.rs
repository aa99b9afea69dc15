//! Loan entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// The book is out.
    Active,
    /// The book has been returned.
    Returned,
}

/// A loan of one book copy to one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    /// Unique loan identifier.
    pub id: Uuid,
    /// The borrowing user.
    pub user_id: Uuid,
    /// The borrowed book.
    pub book_id: Uuid,
    /// When the loan started.
    pub loaned_at: DateTime<Utc>,
    /// When the book is due back.
    pub due_at: DateTime<Utc>,
    /// When the book was returned, if it has been.
    pub returned_at: Option<DateTime<Utc>>,
    /// Current state.
    pub status: LoanStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    /// Whether the loan is active and past its due date.
    pub fn is_overdue(&self) -> bool {
        self.status == LoanStatus::Active && self.due_at < Utc::now()
    }

    /// Number of whole days the loan is overdue (0 if not overdue).
    pub fn overdue_days(&self) -> i64 {
        if !self.is_overdue() {
            return 0;
        }
        (Utc::now() - self.due_at).num_days().max(0)
    }
}

/// Data required to open a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoan {
    /// The borrowing user.
    pub user_id: Uuid,
    /// The book to borrow.
    pub book_id: Uuid,
    /// Due date.
    pub due_at: DateTime<Utc>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Aggregate loan counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoanStats {
    /// Total loans ever opened.
    pub total: i64,
    /// Currently active loans.
    pub active: i64,
    /// Returned loans.
    pub returned: i64,
    /// Active loans past their due date.
    pub overdue: i64,
}

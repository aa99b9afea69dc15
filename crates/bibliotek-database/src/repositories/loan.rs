//! Loan repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bibliotek_core::error::{AppError, ErrorKind};
use bibliotek_core::result::AppResult;
use bibliotek_core::types::pagination::{PageRequest, PageResponse};
use bibliotek_entity::loan::model::{CreateLoan, Loan, LoanStats, LoanStatus};

/// Repository for loan lifecycle operations.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// Create a new loan repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a loan by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Loan>> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find loan", e))
    }

    /// List loans with pagination, optionally restricted to one user and
    /// one status. Regular members always pass their own id.
    pub async fn find_all(
        &self,
        user_id: Option<Uuid>,
        status: Option<LoanStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Loan>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
               AND ($2::loan_status IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count loans", e))?;

        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
               AND ($2::loan_status IS NULL OR status = $2) \
             ORDER BY loaned_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list loans", e))?;

        Ok(PageResponse::new(
            loans,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Open a new loan.
    pub async fn create(&self, data: &CreateLoan) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            "INSERT INTO loans (user_id, book_id, due_at, notes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.book_id)
        .bind(data.due_at)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create loan", e))
    }

    /// Mark an active loan as returned. Returns `None` when the loan was
    /// not active.
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<Option<Loan>> {
        sqlx::query_as::<_, Loan>(
            "UPDATE loans SET status = 'returned', returned_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'active' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark loan returned", e))
    }

    /// Delete a returned loan record.
    pub async fn delete_returned(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1 AND status = 'returned'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete loan", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate loan counters across the whole system.
    pub async fn stats(&self) -> AppResult<LoanStats> {
        sqlx::query_as::<_, LoanStats>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'active') AS active, \
                    COUNT(*) FILTER (WHERE status = 'returned') AS returned, \
                    COUNT(*) FILTER (WHERE status = 'active' AND due_at < NOW()) AS overdue \
             FROM loans",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to compute loan stats", e))
    }
}

//! Book repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bibliotek_core::error::{AppError, ErrorKind};
use bibliotek_core::result::AppResult;
use bibliotek_core::types::pagination::{PageRequest, PageResponse};
use bibliotek_entity::book::model::{Book, CreateBook, UpdateBook};

/// Repository for catalog CRUD and availability updates.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Create a new book repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a book by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find book", e))
    }

    /// List books with pagination, optionally filtered by a search term
    /// matched against title, author, and genre.
    pub async fn find_all(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Book>> {
        let pattern = search.map(|s| format!("%{s}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books \
             WHERE $1::text IS NULL OR title ILIKE $1 OR author ILIKE $1 OR genre ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count books", e))?;

        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books \
             WHERE $1::text IS NULL OR title ILIKE $1 OR author ILIKE $1 OR genre ILIKE $1 \
             ORDER BY title ASC LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list books", e))?;

        Ok(PageResponse::new(
            books,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Add a book to the catalog. New books start with all copies available.
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author, isbn, publication_year, genre, publisher, \
                                total_copies, available_copies, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8) \
             RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.isbn)
        .bind(data.publication_year)
        .bind(&data.genre)
        .bind(&data.publisher)
        .bind(data.total_copies)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("books_isbn_key") => {
                AppError::conflict("A book with this ISBN already exists".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create book", e),
        })
    }

    /// Update a catalog entry. Changing total copies adjusts availability
    /// by the same delta; the delta may not reduce availability below the
    /// number of copies currently on loan.
    pub async fn update(&self, id: Uuid, data: &UpdateBook) -> AppResult<Book> {
        let updated = sqlx::query_as::<_, Book>(
            "UPDATE books SET title = COALESCE($2, title), \
                              author = COALESCE($3, author), \
                              isbn = COALESCE($4, isbn), \
                              publication_year = COALESCE($5, publication_year), \
                              genre = COALESCE($6, genre), \
                              publisher = COALESCE($7, publisher), \
                              available_copies = available_copies + COALESCE($8 - total_copies, 0), \
                              total_copies = COALESCE($8, total_copies), \
                              description = COALESCE($9, description), \
                              updated_at = NOW() \
             WHERE id = $1 \
               AND available_copies + COALESCE($8 - total_copies, 0) >= 0 \
             RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.isbn)
        .bind(data.publication_year)
        .bind(&data.genre)
        .bind(&data.publisher)
        .bind(data.total_copies)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update book", e))?;

        match updated {
            Some(book) => Ok(book),
            None if self.find_by_id(id).await?.is_some() => Err(AppError::conflict(
                "Cannot reduce copies below the number currently on loan",
            )),
            None => Err(AppError::not_found(format!("Book {id} not found"))),
        }
    }

    /// Take one available copy for a loan.
    ///
    /// Returns `false` when no copy was available; the decrement is
    /// conditional so concurrent loans cannot oversell.
    pub async fn take_copy(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1, updated_at = NOW() \
             WHERE id = $1 AND available_copies > 0",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to take copy", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Return one copy to the shelf.
    pub async fn return_copy(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE books SET available_copies = LEAST(available_copies + 1, total_copies), \
                              updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to return copy", e))?;
        Ok(())
    }

    /// Delete a book. Fails with a conflict while active loans reference it.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("loans_book_id_fkey") =>
                {
                    AppError::conflict("Book has loans and cannot be deleted".to_string())
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to delete book", e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}

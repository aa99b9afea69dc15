//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bibliotek_core::error::{AppError, ErrorKind};
use bibliotek_core::result::AppResult;
use bibliotek_core::types::pagination::{PageRequest, PageResponse};
use bibliotek_entity::user::User;
use bibliotek_entity::user::model::{CreateUser, UpdateUser};

/// Repository for user CRUD and credential bookkeeping.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find an unlocked user by email (case-insensitive).
    ///
    /// Locked accounts are indistinguishable from missing ones at the
    /// login boundary.
    pub async fn find_login_candidate(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND locked = FALSE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find login candidate", e)
        })
    }

    /// List all users with pagination.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, surname, email, password_hash, phone, address, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.surname)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("Email already registered".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Update a user's profile fields.
    pub async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = COALESCE($2, name), \
                              surname = COALESCE($3, surname), \
                              phone = COALESCE($4, phone), \
                              address = COALESCE($5, address), \
                              role = COALESCE($6, role), \
                              failed_login_attempts = CASE WHEN $7 THEN 0 ELSE failed_login_attempts END, \
                              locked = CASE WHEN $7 THEN FALSE ELSE locked END, \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.surname)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(data.role)
        .bind(data.unlock.unwrap_or(false))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Update a user's password hash.
    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update password", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }

    /// Record a failed login attempt, locking the account when the counter
    /// reaches the threshold. The increment and the lock decision happen in
    /// a single statement so concurrent failures cannot skip the lock.
    pub async fn record_failed_attempt(&self, user_id: Uuid, threshold: i32) -> AppResult<(i32, bool)> {
        let row: (i32, bool) = sqlx::query_as(
            "UPDATE users SET failed_login_attempts = failed_login_attempts + 1, \
                              locked = locked OR (failed_login_attempts + 1 >= $2), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING failed_login_attempts, locked",
        )
        .bind(user_id)
        .bind(threshold)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record failed attempt", e)
        })?;

        Ok(row)
    }

    /// Reset the failure counter and stamp the last successful login.
    pub async fn record_successful_login(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET failed_login_attempts = 0, last_access_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record successful login", e)
        })?;
        Ok(())
    }

    /// Delete a user by ID.
    pub async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}

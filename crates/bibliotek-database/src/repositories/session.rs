//! Session repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bibliotek_core::error::{AppError, ErrorKind};
use bibliotek_core::result::AppResult;
use bibliotek_entity::session::model::{CreateSession, Session};

/// Repository for per-device session rows.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a new session.
    pub async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, token_jti, refresh_token, ip_address, user_agent, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.token_jti)
        .bind(&data.refresh_token)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Find the active session holding the given refresh token.
    pub async fn find_active_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions \
             WHERE refresh_token = $1 AND active = TRUE AND expires_at > NOW()",
        )
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
        })
    }

    /// List a user's active sessions, newest first.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions \
             WHERE user_id = $1 AND active = TRUE AND expires_at > NOW() \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))
    }

    /// Close the session keyed by the given access token jti.
    ///
    /// Returns `false` when no open session matched; logout treats that as
    /// success.
    pub async fn close_by_jti(&self, user_id: Uuid, token_jti: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET active = FALSE \
             WHERE user_id = $1 AND token_jti = $2 AND active = TRUE",
        )
        .bind(user_id)
        .bind(token_jti)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close session", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Close every open session for a user. Returns how many were closed.
    pub async fn close_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE sessions SET active = FALSE WHERE user_id = $1 AND active = TRUE")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to close sessions", e)
                })?;

        Ok(result.rows_affected())
    }

    /// Point a session at a newly issued access token.
    ///
    /// Called on refresh so logout with the new token still finds its
    /// session.
    pub async fn rotate_jti(&self, session_id: Uuid, new_jti: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET token_jti = $2 WHERE id = $1")
            .bind(session_id)
            .bind(new_jti)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to rotate session jti", e)
            })?;
        Ok(())
    }

    /// Delete expired and closed sessions. Returns how many were removed.
    pub async fn delete_expired(&self) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW() OR active = FALSE")
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete expired sessions", e)
                })?;

        Ok(result.rows_affected())
    }
}

//! Revoked-token repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bibliotek_core::error::{AppError, ErrorKind};
use bibliotek_core::result::AppResult;
use bibliotek_entity::revocation::RevokedToken;

/// Repository for the revoked-token denylist.
#[derive(Debug, Clone)]
pub struct RevocationRepository {
    pool: PgPool,
}

impl RevocationRepository {
    /// Create a new revocation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a token to the denylist. Idempotent: revoking an already
    /// revoked jti is a no-op.
    pub async fn revoke(
        &self,
        token_jti: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO revoked_tokens (token_jti, user_id, expires_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (token_jti) DO NOTHING",
        )
        .bind(token_jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;
        Ok(())
    }

    /// Check whether a jti is on the denylist.
    pub async fn is_revoked(&self, token_jti: Uuid) -> AppResult<bool> {
        let entry = self.find(token_jti).await?;
        Ok(entry.is_some())
    }

    /// Fetch the denylist entry for a jti, if one exists.
    pub async fn find(&self, token_jti: Uuid) -> AppResult<Option<RevokedToken>> {
        sqlx::query_as::<_, RevokedToken>("SELECT * FROM revoked_tokens WHERE token_jti = $1")
            .bind(token_jti)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check revocation", e)
            })
    }

    /// Remove entries whose underlying token has expired. Returns how many
    /// were removed.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge revoked tokens", e)
            })?;

        Ok(result.rows_affected())
    }
}

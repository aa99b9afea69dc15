//! Revoked token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A revoked access token, identified by its `jti` claim.
///
/// Entries become dead weight once the underlying token has expired and
/// are purged by the maintenance sweep.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevokedToken {
    /// The `jti` claim of the revoked token.
    pub token_jti: Uuid,
    /// The user the token was issued to.
    pub user_id: Uuid,
    /// When the token was revoked.
    pub revoked_at: DateTime<Utc>,
    /// When the underlying token expires (purge horizon).
    pub expires_at: DateTime<Utc>,
}

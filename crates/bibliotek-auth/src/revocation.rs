//! Storage-backed access-token denylist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use bibliotek_core::result::AppResult;
use bibliotek_database::repositories::RevocationRepository;

/// Registry of revoked access-token jtis.
///
/// The per-request check can be switched off in configuration, trading
/// immediate revocation for one less storage round-trip per request.
/// Writes always happen regardless of the switch.
#[derive(Debug, Clone)]
pub struct RevocationRegistry {
    repo: Arc<RevocationRepository>,
    check_enabled: bool,
}

impl RevocationRegistry {
    /// Creates a new revocation registry.
    pub fn new(repo: Arc<RevocationRepository>, check_enabled: bool) -> Self {
        Self { repo, check_enabled }
    }

    /// Revoke a token by jti. Idempotent.
    pub async fn revoke(
        &self,
        jti: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.repo.revoke(jti, user_id, expires_at).await?;
        debug!(%jti, %user_id, "Token revoked");
        Ok(())
    }

    /// Check whether a jti has been revoked.
    ///
    /// Always `false` when the per-request check is disabled.
    pub async fn is_revoked(&self, jti: Uuid) -> AppResult<bool> {
        if !self.check_enabled {
            return Ok(false);
        }
        self.repo.is_revoked(jti).await
    }

    /// Purge entries whose underlying token has expired.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        self.repo.purge_expired().await
    }
}

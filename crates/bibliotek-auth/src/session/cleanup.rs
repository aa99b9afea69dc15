//! Periodic maintenance sweep for dead sessions and spent revocations.

use std::sync::Arc;

use tracing::info;

use bibliotek_core::result::AppResult;
use bibliotek_database::repositories::SessionRepository;

use crate::revocation::RevocationRegistry;

/// Removes expired sessions and spent revocation entries.
///
/// Driven by a timer at runtime and run once more during graceful
/// shutdown. Purely garbage collection; correctness never depends on it
/// because expiry is enforced at read time.
#[derive(Clone)]
pub struct MaintenanceSweep {
    sessions: Arc<SessionRepository>,
    revocations: RevocationRegistry,
}

impl std::fmt::Debug for MaintenanceSweep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceSweep").finish()
    }
}

impl MaintenanceSweep {
    /// Creates a new maintenance sweep.
    pub fn new(sessions: Arc<SessionRepository>, revocations: RevocationRegistry) -> Self {
        Self {
            sessions,
            revocations,
        }
    }

    /// Runs one sweep cycle. Returns (sessions removed, revocations purged).
    pub async fn run(&self) -> AppResult<(u64, u64)> {
        let sessions_removed = self.sessions.delete_expired().await?;
        let revocations_purged = self.revocations.purge_expired().await?;

        if sessions_removed > 0 || revocations_purged > 0 {
            info!(
                sessions_removed,
                revocations_purged, "Maintenance sweep completed"
            );
        }

        Ok((sessions_removed, revocations_purged))
    }
}

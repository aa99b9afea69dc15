//! Per-account request counting.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use bibliotek_core::result::AppResult;

pub use memory::InMemoryCounter;

/// Counts requests per account within a sliding window.
///
/// A trait seam so the in-memory counter can be swapped for a shared
/// store when running more than one instance.
#[async_trait]
pub trait RequestCounter: Send + Sync {
    /// Records one request for the account and returns whether it is
    /// still within its budget.
    async fn check_and_record(&self, user_id: Uuid) -> AppResult<bool>;
}

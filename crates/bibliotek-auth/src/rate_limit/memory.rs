//! In-memory sliding-window request counter.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use bibliotek_core::config::rate_limit::RateLimitConfig;
use bibliotek_core::result::AppResult;

use super::RequestCounter;

/// Sliding-window counter held in process memory.
///
/// Single-instance only: each replica counts independently.
#[derive(Debug)]
pub struct InMemoryCounter {
    max_requests: usize,
    window: Duration,
    entries: Mutex<HashMap<Uuid, Vec<Instant>>>,
}

impl InMemoryCounter {
    /// Creates a new counter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests as usize,
            window: Duration::from_secs(config.window_seconds),
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl InMemoryCounter {
    /// Number of accounts currently holding a timestamp entry.
    #[cfg(test)]
    async fn tracked_accounts(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl RequestCounter for InMemoryCounter {
    async fn check_and_record(&self, user_id: Uuid) -> AppResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        // Drop every stale timestamp, and with it any account that has
        // gone fully idle, so the map does not grow without bound.
        entries.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < self.window);
            !timestamps.is_empty()
        });

        let timestamps = entries.entry(user_id).or_default();
        if timestamps.len() >= self.max_requests {
            return Ok(false);
        }

        timestamps.push(now);
        Ok(true)
    }
}

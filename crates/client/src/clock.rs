//! Time source abstraction.
//!
//! The submission policy compares wall-clock timestamps that must survive
//! restarts, so the clock deals in unix epoch milliseconds rather than
//! `Instant`. Tests inject a synthetic clock whose `sleep` advances time
//! instead of waiting.

use async_trait::async_trait;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[async_trait]
pub trait Clock: Send + Sync {
    /// Milliseconds since the unix epoch.
    fn now_ms(&self) -> u64;

    /// Cooperative suspension; never blocks the executor.
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the OS.
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

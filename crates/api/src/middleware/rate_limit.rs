//! Per-address rate limiting.
//!
//! A soft anti-abuse control, not a security boundary: buckets live in
//! process memory and are lost on restart.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use whisper_core::limits::{RATE_LIMIT_QUOTA, RATE_LIMIT_WINDOW_SECS};

/// Outcome of a `consume` call. A rejection is final for that request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Rejected { retry_after_secs: u64 },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Accepted calls per window
    pub quota: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            quota: RATE_LIMIT_QUOTA,
            window: Duration::from_secs(RATE_LIMIT_WINDOW_SECS),
        }
    }
}

/// Per-key state: tokens remaining in the current window.
struct WindowBucket {
    remaining: u32,
    window_start: Instant,
    last_seen: Instant,
}

impl WindowBucket {
    fn new(quota: u32, now: Instant) -> Self {
        Self {
            remaining: quota,
            window_start: now,
            last_seen: now,
        }
    }
}

/// Windowed token-bucket limiter keyed by client address.
///
/// Buckets are created lazily on first sight of a key and refilled when a
/// full window has elapsed. The read-modify-write per key happens under one
/// lock acquisition, so concurrent `consume` calls for the same key cannot
/// both spend the last token.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, WindowBucket>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Spend one token for `key`, creating the bucket on demand.
    pub fn consume(&self, key: &str) -> Decision {
        self.consume_at(key, Instant::now())
    }

    /// Same as `consume` with an explicit clock, so tests never sleep.
    pub fn consume_at(&self, key: &str, now: Instant) -> Decision {
        let mut buckets = self.buckets.lock();

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| WindowBucket::new(self.config.quota, now));

        bucket.last_seen = now;

        // Refill on window rollover.
        if now.duration_since(bucket.window_start) >= self.config.window {
            bucket.remaining = self.config.quota;
            bucket.window_start = now;
        }

        if bucket.remaining > 0 {
            bucket.remaining -= 1;
            Decision::Allowed
        } else {
            let elapsed = now.duration_since(bucket.window_start);
            let retry_after_secs = self
                .config
                .window
                .saturating_sub(elapsed)
                .as_secs()
                .max(1);
            Decision::Rejected { retry_after_secs }
        }
    }

    /// Evict buckets idle longer than `max_age` to bound memory.
    pub fn cleanup(&self, max_age: Duration) {
        let mut buckets = self.buckets.lock();
        let now = Instant::now();

        buckets.retain(|_, bucket| now.duration_since(bucket.last_seen) < max_age);
    }

    /// Number of live buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.lock().len()
    }
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<RateLimiter>;

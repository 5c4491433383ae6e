//! Retry backoff policy.
//!
//! Kept as a pure function of the attempt number so the schedule can be
//! tested without real time passing; the sleep itself lives in the caller.

use std::time::Duration;

use whisper_core::limits::{MAX_SEND_ATTEMPTS, RETRY_INITIAL_DELAY, RETRY_MAX_DELAY};

/// Retry configuration for one logical submission.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_delay: Duration,
    /// Cap applied to the doubled delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_SEND_ATTEMPTS,
            initial_delay: RETRY_INITIAL_DELAY,
            max_delay: RETRY_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after failed attempt `attempt` (1-based).
    ///
    /// Doubles from `initial_delay` and saturates at `max_delay`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(32);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(1u64 << shift);
        Duration::from_millis(delay_ms).min(self.max_delay)
    }
}

//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use message_store::MessageStore;
use whisper_core::limits::RATE_LIMIT_BUCKET_MAX_AGE;

use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter, SharedRateLimiter};

/// Shared application state.
///
/// Handlers are stateless per request; the limiter and the store are the only
/// shared mutable pieces.
#[derive(Clone)]
pub struct AppState {
    /// SQLite store
    pub store: Arc<MessageStore>,
    /// Per-address rate limiter, owned here rather than ambient
    pub rate_limiter: SharedRateLimiter,
    /// Shared secret gating the admin read path
    pub admin_key: Arc<String>,
    /// Allowed CORS origin, `*` or absent meaning any
    pub cors_origin: Option<String>,
}

impl AppState {
    pub fn new(store: Arc<MessageStore>, admin_key: impl Into<String>) -> Self {
        Self::with_rate_limit(store, admin_key, RateLimitConfig::default())
    }

    /// Create with custom rate limit config.
    pub fn with_rate_limit(
        store: Arc<MessageStore>,
        admin_key: impl Into<String>,
        rate_config: RateLimitConfig,
    ) -> Self {
        Self {
            store,
            rate_limiter: Arc::new(RateLimiter::new(rate_config)),
            admin_key: Arc::new(admin_key.into()),
            cors_origin: None,
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    /// Start the rate limiter cleanup background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_rate_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                rate_limiter.cleanup(RATE_LIMIT_BUCKET_MAX_AGE);
            }
        })
    }
}

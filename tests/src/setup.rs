//! Common test setup functions.

use std::sync::Arc;
use std::time::Duration;

use api::middleware::rate_limit::RateLimitConfig;
use api::{router, AppState};
use axum::Router;
use message_store::{MessageStore, StoreConfig};

/// Admin key wired into every test context.
pub const TEST_ADMIN_KEY: &str = "test-admin-key";

/// Test context over the real router and an in-memory SQLite store.
///
/// Exercises the production code paths end to end: the same router, the same
/// extractors and middleware, the same store crate, just with `:memory:` as
/// the database.
pub struct TestContext {
    pub store: Arc<MessageStore>,
    pub router: Router,
}

impl TestContext {
    /// Context with the default rate limit (10 per 60s).
    pub async fn new() -> Self {
        Self::with_rate_limit(RateLimitConfig::default()).await
    }

    /// Context with a custom rate limit config.
    pub async fn with_rate_limit(rate_config: RateLimitConfig) -> Self {
        let store = Arc::new(
            MessageStore::connect(StoreConfig::in_memory())
                .await
                .expect("Failed to open in-memory store"),
        );

        let state = AppState::with_rate_limit(store.clone(), TEST_ADMIN_KEY, rate_config);
        let router = router(state);

        Self { store, router }
    }

    /// Tight limiter for rate-limit tests: `quota` calls per one second.
    pub async fn with_quota(quota: u32) -> Self {
        Self::with_rate_limit(RateLimitConfig {
            quota,
            window: Duration::from_secs(1),
        })
        .await
    }

    /// Rows currently in the messages table.
    pub async fn message_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(self.store.pool())
            .await
            .expect("Failed to count messages")
    }

    /// Rows currently in the analytics_events table.
    pub async fn analytics_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM analytics_events")
            .fetch_one(self.store.pool())
            .await
            .expect("Failed to count analytics events")
    }

    /// Wait for the detached analytics tasks to land at least `expected`
    /// rows. Analytics writes are fire-and-forget, so tests poll briefly
    /// instead of asserting immediately.
    pub async fn wait_for_analytics(&self, expected: i64) -> i64 {
        for _ in 0..50 {
            let count = self.analytics_count().await;
            if count >= expected {
                return count;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.analytics_count().await
    }
}

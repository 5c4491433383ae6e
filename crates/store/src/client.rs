//! Store handle wrapping the SQLite connection pool.

use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;
use whisper_core::{Error, Result};

use crate::config::StoreConfig;
use crate::schema;

/// SQLite store handle with connection pooling.
#[derive(Clone)]
pub struct MessageStore {
    pool: SqlitePool,
    config: StoreConfig,
}

impl MessageStore {
    /// Open the database and create the schema if absent.
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let url = if config.path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            // mode=rwc creates the file on first run
            format!("sqlite://{}?mode=rwc", config.path)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.timeout_secs))
            // An in-memory database lives and dies with its connection; never
            // let the pool recycle it out from under us.
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(&url)
            .await
            .map_err(|e| Error::storage(format!("Failed to open database: {}", e)))?;

        schema::init_schema(&pool).await?;

        info!(path = %config.path, "Connected to SQLite store");

        Ok(Self { pool, config })
    }

    /// Returns the inner pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Cheap connectivity probe for health reporting.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

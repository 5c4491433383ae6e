//! Table schemas.
//!
//! Both tables are created idempotently at startup. There is no migration
//! system: the schema is append-mostly and additive changes ship as new
//! `CREATE TABLE IF NOT EXISTS` statements.

use sqlx::SqlitePool;
use tracing::info;
use whisper_core::{Error, Result};

/// SQL for creating the messages table.
///
/// One row per accepted submission, written exactly once.
pub const CREATE_MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    client_addr TEXT,
    user_agent TEXT,
    fingerprint TEXT NOT NULL,
    session_id TEXT NOT NULL
)
"#;

/// SQL for creating the analytics events table.
///
/// Write-only from the ingestion path; read only by offline review.
pub const CREATE_ANALYTICS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS analytics_events (
    id TEXT PRIMARY KEY,
    event_type TEXT NOT NULL,
    payload TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    client_addr TEXT,
    session_id TEXT
)
"#;

/// Index supporting the newest-first admin listing.
pub const CREATE_MESSAGES_CREATED_IDX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages (created_at DESC)
"#;

/// Create tables if absent. Safe to run on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for stmt in [
        CREATE_MESSAGES_TABLE,
        CREATE_ANALYTICS_TABLE,
        CREATE_MESSAGES_CREATED_IDX,
    ] {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| Error::storage(format!("Schema init failed: {}", e)))?;
    }

    info!("Database schema initialized");
    Ok(())
}

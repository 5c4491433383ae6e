//! Single-row insert operations.

use tracing::debug;
use whisper_core::{Error, NewAnalyticsEvent, NewMessage, Result};

use crate::client::MessageStore;

/// Insert one message row. Returns the server-generated id.
///
/// Ids are minted in `NewMessage`, so duplicates cannot occur in normal
/// operation; a primary key conflict still surfaces as a storage error rather
/// than silently overwriting.
pub async fn insert_message(store: &MessageStore, msg: NewMessage) -> Result<String> {
    sqlx::query(
        r#"
        INSERT INTO messages (id, content, client_addr, user_agent, fingerprint, session_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&msg.id)
    .bind(&msg.content)
    .bind(&msg.client_addr)
    .bind(&msg.user_agent)
    .bind(&msg.fingerprint)
    .bind(&msg.session_id)
    .execute(store.pool())
    .await
    .map_err(|e| Error::storage(format!("Failed to store message: {}", e)))?;

    debug!(id = %msg.id, "Stored message");

    Ok(msg.id)
}

/// Insert one analytics event row.
///
/// Callers on the request path treat this as best-effort: the error is
/// returned so it can be logged, but it must never fold into a request
/// outcome.
pub async fn insert_analytics_event(store: &MessageStore, event: NewAnalyticsEvent) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO analytics_events (id, event_type, payload, client_addr, session_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&event.id)
    .bind(&event.event_type)
    .bind(&event.payload)
    .bind(&event.client_addr)
    .bind(&event.session_id)
    .execute(store.pool())
    .await
    .map_err(|e| Error::storage(format!("Failed to store analytics event: {}", e)))?;

    debug!(event_type = %event.event_type, "Stored analytics event");

    Ok(())
}

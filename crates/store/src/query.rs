//! Read path for the admin surface.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use whisper_core::{Error, Message, Result};

use crate::client::MessageStore;

/// Raw row as stored. Timestamps are TEXT in SQLite and parsed on the way
/// out.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: String,
    pub content: String,
    pub created_at: String,
    pub client_addr: Option<String>,
    pub user_agent: Option<String>,
    pub fingerprint: String,
    pub session_id: String,
}

impl MessageRow {
    fn into_message(self) -> Result<Message> {
        let created_at: DateTime<Utc> = self
            .created_at
            .parse()
            .map_err(|e| Error::storage(format!("Bad timestamp in row {}: {}", self.id, e)))?;

        Ok(Message {
            id: self.id,
            content: self.content,
            created_at,
            client_addr: self.client_addr,
            user_agent: self.user_agent,
            fingerprint: self.fingerprint,
            session_id: self.session_id,
        })
    }
}

/// Fetch the most recent messages, newest first, at most `limit` rows.
pub async fn list_recent_messages(store: &MessageStore, limit: u32) -> Result<Vec<Message>> {
    let rows: Vec<MessageRow> = sqlx::query_as(
        r#"
        SELECT id, content, created_at, client_addr, user_agent, fingerprint, session_id
        FROM messages
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(store.pool())
    .await
    .map_err(|e| Error::storage(format!("Failed to list messages: {}", e)))?;

    rows.into_iter().map(MessageRow::into_message).collect()
}

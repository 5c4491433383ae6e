//! Key-gated read path over captured messages.

use axum::{extract::State, Json};
use tracing::warn;
use whisper_core::limits::ADMIN_LIST_LIMIT;

use crate::extractors::AdminKey;
use crate::response::{AdminListResponse, ApiError};
use crate::state::AppState;

/// GET /admin/messages - bounded newest-first listing.
///
/// The key is a single shared secret, compared directly: this is an internal
/// diagnostic surface, not a multi-tenant auth system. Failure responses are
/// uniform so they reveal nothing about store contents.
pub async fn list_handler(
    State(state): State<AppState>,
    AdminKey(key): AdminKey,
) -> Result<Json<AdminListResponse>, ApiError> {
    let authorized = key
        .as_deref()
        .map(|k| !state.admin_key.is_empty() && k == state.admin_key.as_str())
        .unwrap_or(false);

    if !authorized {
        return Err(ApiError::unauthorized());
    }

    let data = message_store::query::list_recent_messages(&state.store, ADMIN_LIST_LIMIT)
        .await
        .map_err(|e| {
            warn!(error = %e, "Admin listing failed");
            ApiError::storage()
        })?;

    Ok(Json(AdminListResponse {
        count: data.len(),
        data,
    }))
}

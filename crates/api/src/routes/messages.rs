//! Message submission endpoint.
//!
//! The write path: validate, rate-limit, persist, then emit analytics off the
//! response path. A rejected call never touches the store.

use axum::{extract::State, Json};
use tracing::{info, warn};
use validator::Validate;
use whisper_core::{
    limits::ANALYTICS_WRITE_TIMEOUT, message, validate_content, NewAnalyticsEvent, NewMessage,
    SubmitRequest, ValidationErrorCode,
};

use crate::extractors::RequestFingerprint;
use crate::middleware::rate_limit::Decision;
use crate::response::{ApiError, SubmitResponse};
use crate::state::AppState;

/// POST /messages - accept one anonymous submission.
pub async fn submit_handler(
    State(state): State<AppState>,
    RequestFingerprint(fp): RequestFingerprint,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    // Coarse wire-level bound before the real trim-and-check.
    if req.validate().is_err() {
        return Err(whisper_core::Error::validation(
            ValidationErrorCode::TooLong,
            "Message exceeds the wire size limit",
        )
        .into());
    }

    let content = validate_content(&req.content)?;

    // Gate on the per-address quota before any persistence write.
    if let Decision::Rejected { retry_after_secs } = state.rate_limiter.consume(fp.limiter_key()) {
        return Err(ApiError::rate_limited(
            "Too many requests, slow down",
            Some(retry_after_secs),
        ));
    }

    // Accepted call: record the attempt regardless of the outcome below.
    spawn_analytics(
        &state,
        NewAnalyticsEvent::new(
            message::EVENT_MESSAGE_ATTEMPT,
            &serde_json::json!({ "contentLength": content.chars().count() }),
            &fp,
        ),
    );

    let record = NewMessage::from_parts(content, &fp);
    let message_id = record.id.clone();

    match message_store::insert::insert_message(&state.store, record).await {
        Ok(id) => {
            info!(
                addr = fp.addr.as_deref().unwrap_or("unknown"),
                id = %id,
                "Message received"
            );

            spawn_analytics(
                &state,
                NewAnalyticsEvent::new(
                    message::EVENT_MESSAGE_SUBMITTED,
                    &serde_json::json!({ "messageId": id, "success": true }),
                    &fp,
                ),
            );

            Ok(Json(SubmitResponse::success(id)))
        }
        Err(e) => {
            warn!(error = %e, "Failed to store message");

            spawn_analytics(
                &state,
                NewAnalyticsEvent::new(
                    message::EVENT_MESSAGE_FAILED,
                    &serde_json::json!({ "messageId": message_id, "success": false }),
                    &fp,
                ),
            );

            Err(e.into())
        }
    }
}

/// Fire-and-forget analytics write with a bounded timeout.
///
/// Failures are logged and discarded; they must never fold into the request
/// outcome.
pub(crate) fn spawn_analytics(state: &AppState, event: NewAnalyticsEvent) {
    let store = state.store.clone();
    tokio::spawn(async move {
        let event_type = event.event_type.clone();
        match tokio::time::timeout(
            ANALYTICS_WRITE_TIMEOUT,
            message_store::insert::insert_analytics_event(&store, event),
        )
        .await
        {
            Err(_) => warn!(event_type = %event_type, "Analytics write timed out"),
            Ok(Err(e)) => warn!(event_type = %event_type, error = %e, "Analytics write failed"),
            Ok(Ok(())) => {}
        }
    });
}

//! Analytics collection endpoint.
//!
//! Always answers 200: the caller gets no signal about whether the event
//! actually landed. Persistence failures are logged only.

use axum::{extract::State, Json};
use whisper_core::{AnalyticsRequest, NewAnalyticsEvent};

use crate::extractors::RequestFingerprint;
use crate::response::AnalyticsResponse;
use crate::routes::messages::spawn_analytics;
use crate::state::AppState;

/// POST /analytics - fire-and-forget event collection.
pub async fn analytics_handler(
    State(state): State<AppState>,
    RequestFingerprint(fp): RequestFingerprint,
    Json(req): Json<AnalyticsRequest>,
) -> Json<AnalyticsResponse> {
    spawn_analytics(&state, NewAnalyticsEvent::new(req.event, &req.data, &fp));

    Json(AnalyticsResponse::tracked())
}

//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use whisper_core::Message;

/// Success response for `POST /messages`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub status: String,
    pub message_id: String,
}

impl SubmitResponse {
    pub fn success(message_id: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message_id: message_id.into(),
        }
    }
}

/// Response for `POST /analytics`. Always returned with 200.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub status: String,
}

impl AnalyticsResponse {
    pub fn tracked() -> Self {
        Self {
            status: "tracked".to_string(),
        }
    }
}

/// Response for `GET /admin/messages`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminListResponse {
    pub count: usize,
    pub data: Vec<Message>,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database_connected: bool,
    pub timestamp: i64,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
            message: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// API error type carrying status, body, and an optional Retry-After.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
    pub retry_after: Option<u64>,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
            retry_after: None,
        }
    }

    pub fn validation(code: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ErrorResponse::new("Validation failed", code).with_details(errors),
            retry_after: None,
        }
    }

    pub fn rate_limited(msg: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            response: ErrorResponse::new("Rate limit exceeded", "RATE_001").with_message(msg),
            retry_after,
        }
    }

    /// Generic 401. The body never varies with store contents.
    pub fn unauthorized() -> Self {
        Self::with_code(StatusCode::UNAUTHORIZED, "AUTH_001", "Unauthorized")
    }

    /// Generic 500. Underlying cause is logged server-side, not echoed.
    pub fn storage() -> Self {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            "DB_001",
            "Storage error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

impl From<whisper_core::Error> for ApiError {
    fn from(err: whisper_core::Error) -> Self {
        match &err {
            whisper_core::Error::Validation { code, message } => {
                ApiError::validation(code.code(), vec![message.clone()])
            }
            whisper_core::Error::RateLimited {
                message,
                retry_after,
            } => ApiError::rate_limited(message.clone(), *retry_after),
            whisper_core::Error::Unauthorized(_) => ApiError::unauthorized(),
            // Storage and everything else collapse to a generic 500 so the
            // response cannot be used as an oracle.
            _ => ApiError::storage(),
        }
    }
}

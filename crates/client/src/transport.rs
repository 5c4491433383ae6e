//! Transport seam between the submission policy and the wire.
//!
//! The state machine only sees this trait; tests swap in a scripted mock and
//! the real client talks HTTP via reqwest.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use whisper_core::{Error, Result, ValidationErrorCode};

/// One-way view of the ingestion service.
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    /// One-time remote warm-up signal.
    async fn warm_up(&self) -> Result<()>;

    /// Submit one message. Returns the server-generated message id.
    async fn send(&self, content: &str, session_id: &str) -> Result<String>;
}

/// HTTP transport against a whisperbox deployment.
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Map a non-success response onto the error taxonomy, deciding
    /// retryability for the state machine.
    async fn error_from_response(response: reqwest::Response) -> Error {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let detail = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();

        match status.as_u16() {
            400 => {
                let code = body.get("code").and_then(Value::as_str);
                let code = if code == Some("VALID_002") {
                    ValidationErrorCode::TooLong
                } else {
                    ValidationErrorCode::Empty
                };
                Error::validation(code, detail)
            }
            401 => Error::unauthorized(detail),
            429 => Error::rate_limited(detail, None),
            500..=599 => Error::storage(detail),
            _ => Error::network(format!("Unexpected status {}: {}", status, detail)),
        }
    }
}

#[async_trait]
impl SubmitTransport for HttpTransport {
    async fn warm_up(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "Warming up");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Warm-up request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "Warm-up returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn send(&self, content: &str, session_id: &str) -> Result<String> {
        let url = format!("{}/messages", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("X-Session-ID", session_id)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(|e| Error::network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::network(format!("Malformed response: {}", e)))?;

        body.get("messageId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::network("Response missing messageId".to_string()))
    }
}

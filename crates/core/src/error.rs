//! Unified error types for whisperbox.
//!
//! Error codes:
//! - VALID_001-002: Validation errors
//! - RATE_001: Rate limit errors
//! - DB_001: Storage errors
//! - AUTH_001: Admin key errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Content empty after trimming
    Empty,
    /// VALID_002: Content exceeds the 500 character limit
    TooLong,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "VALID_001",
            Self::TooLong => "VALID_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        400
    }
}

/// Unified error type for the submission pipeline.
///
/// Retry classification matters to the submission client: `Storage` and
/// `Network` are transient and retried under backoff; `Validation`,
/// `RateLimited`, and `Unauthorized` are terminal for the attempt.
#[derive(Debug, Error)]
pub enum Error {
    /// Content failed validation. Client-fixable, never retried.
    #[error("[{code}] {message}", code = .code.code())]
    Validation {
        code: ValidationErrorCode,
        message: String,
    },

    /// Caller exceeded the per-address quota. Final for this call.
    #[error("[RATE_001] {message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },

    /// Persistence write failed. Assumed transient.
    #[error("[DB_001] {0}")]
    Storage(String),

    /// Admin key mismatch. Terminal, never retried.
    #[error("[AUTH_001] {0}")]
    Unauthorized(String),

    /// Client could not reach the service. Transient.
    #[error("network error: {0}")]
    Network(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error.
    pub fn validation(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: msg.into(),
        }
    }

    /// Create a rate limit error.
    pub fn rate_limited(msg: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimited {
            message: msg.into(),
            retry_after,
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { code, .. } => code.http_status(),
            Self::RateLimited { .. } => 429,
            Self::Storage(_) => 500,
            Self::Unauthorized(_) => 401,
            Self::Network(_) => 502,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Validation { code, .. } => Some(code.code()),
            Self::RateLimited { .. } => Some("RATE_001"),
            Self::Storage(_) => Some("DB_001"),
            Self::Unauthorized(_) => Some("AUTH_001"),
            _ => None,
        }
    }

    /// Whether the submission client should retry after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Network(_))
    }
}

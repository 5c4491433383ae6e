//! Resilient submission client for whisperbox.
//!
//! Wraps the ingestion API with the caller-side policy: a warm-up dependency,
//! a cooldown between successes, a one-shot marker, a double-click damper,
//! and retry with exponential backoff for transient failures. All policy
//! state lives in a durable local file; the server never enforces it.

pub mod backoff;
pub mod clock;
pub mod session;
pub mod submit;
pub mod transport;

pub use backoff::RetryPolicy;
pub use clock::{Clock, SystemClock};
pub use session::{SessionState, SessionStore};
pub use submit::{format_remaining, SubmitClient, SubmitClientConfig, SubmitOutcome, SubmitState};
pub use transport::{HttpTransport, SubmitTransport};

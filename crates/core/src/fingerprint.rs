//! Per-request client identity collection.
//!
//! Every inbound call carries an identity tuple derived from the transport:
//! network address, user agent, and a session token the caller may supply.
//! The tuple is stored alongside each message both as discrete columns and as
//! an opaque serialized blob, so the capture survives schema drift in the
//! collector.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity tuple collected from one request.
///
/// Stateless: derived fresh per call, never cached server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Client network address, best-effort (proxy headers first).
    pub addr: Option<String>,
    /// User-Agent header verbatim.
    pub user_agent: Option<String>,
    /// Caller-supplied session token, or a fresh one if absent.
    pub session_id: String,
}

impl Fingerprint {
    /// Build a fingerprint, minting a session id when the caller sent none.
    pub fn collect(
        addr: Option<String>,
        user_agent: Option<String>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            addr,
            user_agent,
            session_id: session_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }

    /// Address to key the rate limiter with.
    ///
    /// Unknown addresses share one bucket rather than bypassing the limiter.
    pub fn limiter_key(&self) -> &str {
        self.addr.as_deref().unwrap_or("unknown")
    }

    /// Opaque serialized form persisted with each message.
    pub fn to_blob(&self) -> String {
        // Serialization of a plain struct with string fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

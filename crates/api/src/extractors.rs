//! Request extractors.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use whisper_core::Fingerprint;

/// Fingerprint collected from one inbound request.
///
/// Pulls the client address (proxy headers first), the user agent, and the
/// caller's session token. A missing session token gets a fresh one so every
/// stored row carries a session id.
#[derive(Debug, Clone)]
pub struct RequestFingerprint(pub Fingerprint);

#[async_trait]
impl<S> FromRequestParts<S> for RequestFingerprint
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let addr = client_addr(parts);

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        let session_id = parts
            .headers
            .get("X-Session-ID")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Ok(RequestFingerprint(Fingerprint::collect(
            addr, user_agent, session_id,
        )))
    }
}

fn client_addr(parts: &Parts) -> Option<String> {
    // X-Forwarded-For first (for proxied requests), first hop in the chain.
    if let Some(xff) = parts.headers.get("X-Forwarded-For") {
        if let Ok(xff_str) = xff.to_str() {
            if let Some(ip) = xff_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }
    }

    if let Some(real_ip) = parts.headers.get("X-Real-IP") {
        if let Ok(ip) = real_ip.to_str() {
            return Some(ip.to_string());
        }
    }

    None
}

/// Admin key header, if present. Comparison happens in the handler.
#[derive(Debug, Clone)]
pub struct AdminKey(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for AdminKey
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get("X-Admin-Key")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Ok(AdminKey(key))
    }
}

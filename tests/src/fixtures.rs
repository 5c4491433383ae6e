//! Request payload fixtures.

use serde_json::{json, Value};

/// Standard submission body.
pub fn submit_body(content: &str) -> Value {
    json!({ "content": content })
}

/// Content at exactly the 500 character limit.
pub fn max_length_content() -> String {
    "x".repeat(500)
}

/// Content one character over the limit.
pub fn over_length_content() -> String {
    "x".repeat(501)
}

/// Analytics event body.
pub fn analytics_body(event: &str) -> Value {
    json!({ "event": event, "data": { "source": "integration-test" } })
}

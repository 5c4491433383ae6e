//! Tests for rejection paths: validation and rate limiting.
//!
//! A rejected call must leave the messages table untouched.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn empty_content_returns_valid_001() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/messages")
        .json(&fixtures::submit_body("   \n\t  "))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
    assert_eq!(body["error"], "Validation failed");

    assert_eq!(ctx.message_count().await, 0);
}

#[tokio::test]
async fn over_length_content_returns_valid_002() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/messages")
        .json(&fixtures::submit_body(&fixtures::over_length_content()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");

    assert_eq!(ctx.message_count().await, 0);
}

#[tokio::test]
async fn whitespace_padding_does_not_evade_the_length_limit() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // 501 meaningful characters surrounded by whitespace.
    let padded = format!("  {}  ", fixtures::over_length_content());
    let response = server
        .post("/messages")
        .json(&fixtures::submit_body(&padded))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");
}

#[tokio::test]
async fn quota_exhaustion_returns_rate_001_without_persisting() {
    let ctx = TestContext::with_quota(3).await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for i in 0..3 {
        server
            .post("/messages")
            .add_header("X-Real-IP", "198.51.100.9")
            .json(&fixtures::submit_body(&format!("message {}", i)))
            .await
            .assert_status_ok();
    }

    // The (N+1)-th call from the same address is rejected.
    let response = server
        .post("/messages")
        .add_header("X-Real-IP", "198.51.100.9")
        .json(&fixtures::submit_body("one too many"))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "RATE_001");
    assert!(body["message"].is_string());
    assert!(response.headers().contains_key("Retry-After"));

    // Only the accepted calls reached the store.
    assert_eq!(ctx.message_count().await, 3);
}

#[tokio::test]
async fn quota_recovers_after_the_window() {
    let ctx = TestContext::with_quota(1).await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/messages")
        .add_header("X-Real-IP", "198.51.100.10")
        .json(&fixtures::submit_body("first"))
        .await
        .assert_status_ok();

    server
        .post("/messages")
        .add_header("X-Real-IP", "198.51.100.10")
        .json(&fixtures::submit_body("second"))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    // Window is one second in this context.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    server
        .post("/messages")
        .add_header("X-Real-IP", "198.51.100.10")
        .json(&fixtures::submit_body("after the window"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn distinct_addresses_have_independent_quotas() {
    let ctx = TestContext::with_quota(1).await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/messages")
        .add_header("X-Real-IP", "198.51.100.11")
        .json(&fixtures::submit_body("from eleven"))
        .await
        .assert_status_ok();

    server
        .post("/messages")
        .add_header("X-Real-IP", "198.51.100.12")
        .json(&fixtures::submit_body("from twelve"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/messages")
        .content_type("application/json")
        .bytes(r#"{"content": "#.into())
        .await;

    assert!(response.status_code().is_client_error());
    assert_eq!(ctx.message_count().await, 0);
}

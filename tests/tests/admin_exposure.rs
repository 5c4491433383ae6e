//! Tests for the key-gated admin read path.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures,
    setup::{TestContext, TEST_ADMIN_KEY},
};
use message_store::insert::insert_message;
use whisper_core::{Fingerprint, NewMessage};

fn seed_fingerprint() -> Fingerprint {
    Fingerprint::collect(
        Some("203.0.113.50".into()),
        Some("seed-agent".into()),
        Some("sess-seed".into()),
    )
}

#[tokio::test]
async fn missing_key_is_unauthorized() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/admin/messages").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_001");
}

#[tokio::test]
async fn wrong_key_is_unauthorized() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Even with rows present, a bad key learns nothing.
    insert_message(
        &ctx.store,
        NewMessage::from_parts("secret".into(), &seed_fingerprint()),
    )
    .await
    .unwrap();

    let response = server
        .get("/admin/messages")
        .add_header("X-Admin-Key", "not-the-key")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_001");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn correct_key_lists_newest_first() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for content in ["first", "second", "third"] {
        insert_message(
            &ctx.store,
            NewMessage::from_parts(content.into(), &seed_fingerprint()),
        )
        .await
        .unwrap();
        // Keep created_at strictly increasing across rows.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = server
        .get("/admin/messages")
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"][0]["content"], "third");
    assert_eq!(body["data"][2]["content"], "first");
}

#[tokio::test]
async fn listing_is_bounded_to_fifty_rows() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for i in 0..55 {
        insert_message(
            &ctx.store,
            NewMessage::from_parts(format!("message {}", i), &seed_fingerprint()),
        )
        .await
        .unwrap();
    }

    let response = server
        .get("/admin/messages")
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 50);
    assert_eq!(body["data"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn submitted_content_round_trips_verbatim() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/messages")
        .add_header("X-Session-ID", "sess-rt")
        .json(&fixtures::submit_body("hello world"))
        .await
        .assert_status_ok();

    let response = server
        .get("/admin/messages")
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    let row = &body["data"][0];
    assert_eq!(row["content"], "hello world");
    assert_eq!(row["session_id"], "sess-rt");
    assert!(row["created_at"].is_string());
}

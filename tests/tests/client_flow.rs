//! Submission client against a live service instance.
//!
//! The state machine itself is unit tested with mocks in `submit-client`;
//! these tests exercise the HTTP transport and the full stack over a real
//! socket.

use std::sync::Arc;

use axum::Router;
use integration_tests::setup::TestContext;
use message_store::query::list_recent_messages;
use submit_client::clock::SystemClock;
use submit_client::submit::{SubmitClient, SubmitClientConfig, SubmitOutcome, SubmitState};
use submit_client::transport::HttpTransport;

/// Serve the router on an ephemeral local port and return its base URL.
async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    format!("http://{}", addr)
}

fn make_client(base_url: &str, dir: &tempfile::TempDir) -> SubmitClient {
    SubmitClient::new(
        Arc::new(HttpTransport::new(base_url)),
        Arc::new(SystemClock),
        dir.path().join("session.json"),
        SubmitClientConfig::default(),
    )
    .expect("Failed to build client")
}

#[tokio::test]
async fn submission_over_http_lands_in_store() {
    let ctx = TestContext::new().await;
    let base_url = spawn_service(ctx.router.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let client = make_client(&base_url, &dir);
    let outcome = client.submit("  hello from the client  ").await.unwrap();

    let message_id = match outcome {
        SubmitOutcome::Accepted { message_id } => message_id,
        other => panic!("expected acceptance, got {:?}", other),
    };
    assert_eq!(client.state(), SubmitState::Succeeded);

    let stored = list_recent_messages(&ctx.store, 10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, message_id);
    assert_eq!(stored[0].content, "hello from the client");
    // The durable session id travels with the request.
    assert_eq!(stored[0].session_id, client.session_id());
}

#[tokio::test]
async fn repeat_submission_resolves_locally() {
    let ctx = TestContext::new().await;
    let base_url = spawn_service(ctx.router.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let client = make_client(&base_url, &dir);
    client.submit("first and only").await.unwrap();

    let outcome = client.submit("second try").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::CooldownActive { .. }));

    // The gated call never reached the service.
    assert_eq!(ctx.message_count().await, 1);
}

#[tokio::test]
async fn service_rate_limit_is_a_terminal_client_error() {
    let ctx = TestContext::with_quota(1).await;
    let base_url = spawn_service(ctx.router.clone()).await;

    let dir_a = tempfile::tempdir().unwrap();
    let first = make_client(&base_url, &dir_a);
    first.submit("takes the quota").await.unwrap();

    // A different client shares the source address, so the service rejects
    // it; the state machine must not burn retries on a 429.
    let dir_b = tempfile::tempdir().unwrap();
    let second = make_client(&base_url, &dir_b);
    let err = second.submit("over quota").await.unwrap_err();

    assert_eq!(err.error_code(), Some("RATE_001"));
    assert_eq!(second.state(), SubmitState::Failed);
    assert_eq!(ctx.message_count().await, 1);
}

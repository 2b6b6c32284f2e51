use httpmock::prelude::*;
use parley_application::{SessionController, SessionHandle};
use parley_core::turn::Sender;
use parley_interaction::HttpGenerationClient;
use serde_json::json;
use std::sync::Arc;

fn session_for(server: &MockServer) -> SessionHandle {
    let client = HttpGenerationClient::new(server.url("/generate"));
    SessionController::spawn(Arc::new(client))
}

#[tokio::test]
async fn test_round_trip_appends_user_and_assistant_turns() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/generate")
                .json_body(json!({ "user_prompt": "Hello" }));
            then.status(200).json_body(json!({ "response": "Hi there" }));
        })
        .await;

    let session = session_for(&server);
    session.edit_draft("Hello").await.unwrap();
    let settled = session.submit_and_wait().await.unwrap();

    mock.assert_async().await;
    let turns: Vec<_> = settled
        .state
        .transcript()
        .iter()
        .map(|turn| (turn.sender(), turn.text().to_string()))
        .collect();
    assert_eq!(
        turns,
        vec![
            (Sender::User, "Hello".to_string()),
            (Sender::Assistant, "Hi there".to_string()),
        ]
    );
    assert!(!settled.is_pending());
    assert!(settled.last_error().is_none());
}

#[tokio::test]
async fn test_server_error_without_body_reports_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/generate");
            then.status(500);
        })
        .await;

    let session = session_for(&server);
    session.edit_draft("Ping").await.unwrap();
    let settled = session.submit_and_wait().await.unwrap();

    assert_eq!(settled.state.transcript().len(), 1);
    assert_eq!(settled.state.transcript().as_slice()[0].text(), "Ping");
    assert!(settled.last_error().unwrap().contains("500"));
    assert!(!settled.is_pending());
}

#[tokio::test]
async fn test_server_detail_becomes_error_banner() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/generate");
            then.status(400)
                .json_body(json!({ "detail": "prompt too long" }));
        })
        .await;

    let session = session_for(&server);
    session.edit_draft("a".repeat(64)).await.unwrap();
    let settled = session.submit_and_wait().await.unwrap();

    assert_eq!(settled.last_error(), Some("prompt too long"));
}

#[tokio::test]
async fn test_whitespace_draft_never_reaches_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/generate");
            then.status(200).json_body(json!({ "response": "unexpected" }));
        })
        .await;

    let session = session_for(&server);
    session.edit_draft("   ").await.unwrap();
    let before = session.snapshot();
    let after = session.submit_and_wait().await.unwrap();

    assert_eq!(after, before);
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_next_submission_replaces_error() {
    let server = MockServer::start_async().await;
    let mut failing = server
        .mock_async(|when, then| {
            when.method(POST).path("/generate");
            then.status(503)
                .json_body(json!({
                    "detail": "Gemini model not initialized. Service is unavailable."
                }));
        })
        .await;

    let session = session_for(&server);
    session.edit_draft("first").await.unwrap();
    let failed = session.submit_and_wait().await.unwrap();
    assert!(failed.last_error().is_some());

    failing.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/generate");
            then.status(200).json_body(json!({ "response": "recovered" }));
        })
        .await;

    session.edit_draft("second").await.unwrap();
    let recovered = session.submit_and_wait().await.unwrap();

    assert!(recovered.last_error().is_none());
    assert_eq!(recovered.state.transcript().len(), 3);
    assert_eq!(
        recovered.state.transcript().last().unwrap().text(),
        "recovered"
    );
}

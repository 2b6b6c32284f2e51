//! Chat client -> generation server -> mocked Gemini API.

use httpmock::prelude::*;
use parley_core::GenerationClient;
use parley_interaction::{GeminiApiAgent, HttpGenerationClient};
use parley_server::{AppState, TextGenerator, full_prompt, router};
use serde_json::json;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "Answer formally.";

async fn serve(generator: Option<Arc<dyn TextGenerator>>) -> String {
    let app = router(AppState::new(generator, SYSTEM_PROMPT), &[]);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/generate")
}

fn gemini(upstream: &MockServer) -> Option<Arc<dyn TextGenerator>> {
    let agent: Arc<dyn TextGenerator> =
        Arc::new(GeminiApiAgent::new("secret", "gemini-test").with_base_url(upstream.base_url()));
    Some(agent)
}

#[tokio::test]
async fn test_reply_travels_back_to_client() {
    let upstream = MockServer::start_async().await;
    let mock = upstream
        .mock_async(|when, then| {
            when.method(POST)
                .path("/gemini-test:generateContent")
                .query_param("key", "secret")
                .json_body(json!({
                    "contents": [{
                        "role": "user",
                        "parts": [{ "text": full_prompt(SYSTEM_PROMPT, "What is Rust?") }]
                    }]
                }));
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [
                    { "text": "A systems " },
                    { "text": "programming language." }
                ] } }]
            }));
        })
        .await;

    let endpoint = serve(gemini(&upstream)).await;
    let client = HttpGenerationClient::new(endpoint);
    let reply = client.generate("What is Rust?").await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply, "A systems programming language.");
}

#[tokio::test]
async fn test_blocked_prompt_surfaces_detail_to_client() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(POST).path("/gemini-test:generateContent");
            then.status(200).json_body(json!({
                "candidates": [],
                "promptFeedback": { "blockReason": "SAFETY" }
            }));
        })
        .await;

    let endpoint = serve(gemini(&upstream)).await;
    let err = HttpGenerationClient::new(endpoint)
        .generate("something unsafe")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message(),
        "Response blocked due to safety concerns (SAFETY). Please modify your prompt."
    );
}

#[tokio::test]
async fn test_missing_api_key_surfaces_503_detail() {
    let endpoint = serve(None).await;
    let err = HttpGenerationClient::new(endpoint)
        .generate("Hello")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(
        err.user_message(),
        "Gemini API key not configured. Service is unavailable."
    );
}

//! GeminiApiAgent - Direct REST API implementation for Gemini.
//!
//! This agent calls the Gemini `generateContent` REST endpoint directly. It is
//! the upstream of the generation server; the chat client never talks to it.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const UNKNOWN_BLOCK_REASON: &str = "Unknown safety block";

/// Failure of a Gemini API call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeminiError {
    /// The request did not complete.
    #[error("Gemini API request failed: {message}")]
    Request { message: String },

    /// Gemini answered with a non-success status.
    #[error("Gemini API error ({status}): {message}")]
    Http { status: u16, message: String },

    /// The prompt or the candidate was blocked by safety filters.
    #[error("Gemini response was blocked: {reason}")]
    Blocked { reason: String },

    /// The body could not be decoded.
    #[error("Failed to parse Gemini response: {message}")]
    Parse { message: String },
}

/// Agent implementation that talks to the Gemini HTTP API.
#[derive(Clone, Debug)]
pub struct GeminiApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points the agent at a different API root (local proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a completion for a single text prompt.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        self.send_request(&request).await
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, GeminiError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.base_url,
            model = self.model,
        );

        tracing::info!(model = %self.model, "Sending request to Gemini model");

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| GeminiError::Request {
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|err| GeminiError::Parse {
                message: err.to_string(),
            })?;

        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Joins the text parts of the first candidate.
///
/// A response without any text part was blocked; the reason comes from
/// `promptFeedback.blockReason` when Gemini supplies one.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, GeminiError> {
    let text: Vec<String> = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| UNKNOWN_BLOCK_REASON.to_string());
        return Err(GeminiError::Blocked { reason });
    }

    Ok(text.concat())
}

fn map_http_error(status: StatusCode, body: String) -> GeminiError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    GeminiError::Http {
        status: status.as_u16(),
        message,
    }
}

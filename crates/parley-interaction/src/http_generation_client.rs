//! HttpGenerationClient - the client side of the `/generate` endpoint.
//!
//! One `POST` per prompt with a JSON body `{"user_prompt": ...}`. Failures are
//! classified into [`GenerationError`] before they reach the controller.

use async_trait::async_trait;
use parley_core::config::ClientConfig;
use parley_core::error::{GenerationError, ParleyError, Result};
use parley_core::generation::{ErrorDetail, GenerationClient, GenerationReply, GenerationRequest};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Generation client that talks to the endpoint over HTTP.
#[derive(Clone, Debug)]
pub struct HttpGenerationClient {
    client: Client,
    endpoint: String,
}

impl HttpGenerationClient {
    /// Creates a client for `endpoint` with no transport timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Builds a client from the `[client]` configuration section.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder
            .build()
            .map_err(|e| ParleyError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        let body = GenerationRequest {
            user_prompt: prompt.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(endpoint = %self.endpoint, "generation request failed: {err}");
                GenerationError::transport(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body still reports the status line.
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let body_text = response
            .text()
            .await
            .map_err(|err| GenerationError::transport(format!("Failed to read response: {err}")))?;
        parse_reply(&body_text)
    }
}

fn parse_reply(body: &str) -> std::result::Result<String, GenerationError> {
    serde_json::from_str::<GenerationReply>(body)
        .map(|reply| reply.response)
        .map_err(|err| GenerationError::invalid_response(err.to_string()))
}

/// Uses the server's `detail` when the body carries one, otherwise the status line.
fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    match serde_json::from_str::<ErrorDetail>(body) {
        Ok(ErrorDetail { detail }) if !detail.trim().is_empty() => {
            GenerationError::remote(status.as_u16(), detail)
        }
        _ => GenerationError::from_status(status.as_u16(), status.canonical_reason()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_body_is_used_verbatim() {
        let err = map_http_error(StatusCode::BAD_REQUEST, r#"{"detail":"prompt too long"}"#);
        assert_eq!(err, GenerationError::remote(400, "prompt too long"));
    }

    #[test]
    fn test_non_json_body_falls_back_to_status() {
        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.user_message(), "API Error: 500 Internal Server Error");
    }

    #[test]
    fn test_non_string_detail_falls_back_to_status() {
        // Validation errors carry `detail` as a list of objects.
        let err = map_http_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","user_prompt"],"msg":"field required"}]}"#,
        );
        assert_eq!(err.user_message(), "API Error: 422 Unprocessable Entity");
    }

    #[test]
    fn test_empty_detail_falls_back_to_status() {
        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, r#"{"detail":""}"#);
        assert_eq!(err.user_message(), "API Error: 503 Service Unavailable");
    }

    #[test]
    fn test_reply_without_response_field_is_invalid() {
        let err = parse_reply(r#"{"text":"hi"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse { .. }));
    }

    #[test]
    fn test_config_endpoint_is_used() {
        let config = ClientConfig {
            endpoint: "http://example.test/generate".to_string(),
            request_timeout_secs: Some(5),
        };
        let client = HttpGenerationClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "http://example.test/generate");
    }
}

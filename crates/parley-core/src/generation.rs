//! Remote generation boundary.
//!
//! Wire types for the `/generate` call and the trait the session controller
//! uses to reach the endpoint. The client is stateless: one prompt in, one
//! reply or one classified failure out.

use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub user_prompt: String,
}

/// Success body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReply {
    pub response: String,
}

/// Failure body returned with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// A single request/response call to the text-generation endpoint.
///
/// Implementations must not retry and must settle every call exactly once.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

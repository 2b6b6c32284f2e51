use async_trait::async_trait;
use parley_interaction::{GeminiApiAgent, GeminiError};

/// Upstream that turns a full prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, full_prompt: &str) -> Result<String, GeminiError>;
}

#[async_trait]
impl TextGenerator for GeminiApiAgent {
    async fn generate_text(&self, full_prompt: &str) -> Result<String, GeminiError> {
        self.generate(full_prompt).await
    }
}

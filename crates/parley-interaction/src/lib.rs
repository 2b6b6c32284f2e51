//! Remote collaborators of the chat session.
//!
//! - [`HttpGenerationClient`]: the client side of `POST /generate`, used by
//!   the session controller.
//! - [`GeminiApiAgent`]: the upstream Gemini REST API, used by the
//!   generation server.

pub mod gemini_api_agent;
pub mod http_generation_client;

pub use gemini_api_agent::{GeminiApiAgent, GeminiError};
pub use http_generation_client::HttpGenerationClient;

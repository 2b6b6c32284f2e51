//! Generation server for Parley.
//!
//! Wraps each user prompt with the configured system prompt and forwards it
//! to a [`TextGenerator`], normally the Gemini REST API.

pub mod generator;
pub mod routes;

pub use generator::TextGenerator;
pub use routes::{AppState, full_prompt, router};

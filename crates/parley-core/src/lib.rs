pub mod config;
pub mod error;
pub mod generation;
pub mod session;
pub mod transcript;
pub mod turn;

// Re-export common error types
pub use error::{GenerationError, ParleyError};
pub use generation::GenerationClient;
pub use session::{SessionAction, SessionEffect, SessionState, Transition, transition};
pub use transcript::Transcript;
pub use turn::{Sender, Turn, TurnId};

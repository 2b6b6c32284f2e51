//! Session domain module.
//!
//! This module holds the conversation session state and the pure transition
//! function that is the only way to change it.
//!
//! # Module Structure
//!
//! - `state`: The session state container (`SessionState`, `RequestId`)
//! - `action`: Intents and settlements fed into the transition (`SessionAction`)
//! - `effect`: Side effects requested by a transition (`SessionEffect`)
//! - `transition`: The transition function (`transition`, `Transition`)
//!
//! # Usage
//!
//! ```
//! use parley_core::session::{SessionAction, SessionEffect, SessionState, transition};
//!
//! let state = SessionState::new();
//! let edited = transition(&state, SessionAction::EditDraft("Hello".into())).state;
//! let submitted = transition(&edited, SessionAction::Submit);
//!
//! assert!(submitted.state.is_pending());
//! assert!(submitted
//!     .effects
//!     .iter()
//!     .any(|effect| matches!(effect, SessionEffect::RequestGeneration { .. })));
//! ```

mod action;
mod effect;
mod state;
mod transition;


// Re-export public API
pub use action::{IgnoredReason, SessionAction};
pub use effect::SessionEffect;
pub use state::{RequestId, SessionState};
pub use transition::{Transition, TransitionOutcome, transition};

//! Side effects requested by a transition.
//!
//! The transition never performs I/O. It describes what must happen next and
//! the session controller (or the renderer) carries it out.

use super::state::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Invoke the remote generation client with `prompt` and feed the
    /// settlement back tagged with `request`.
    RequestGeneration { request: RequestId, prompt: String },
    /// The transcript grew; the newest turn should be brought into view.
    ScrollToLatest,
}

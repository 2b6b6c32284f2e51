//! The session state container.

use crate::transcript::Transcript;
use crate::turn::TurnId;
use serde::{Deserialize, Serialize};

/// Identity of one remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// State of the single conversation a session holds.
///
/// Fields are private so that every change goes through
/// [`transition`](super::transition). At most one request is outstanding at a
/// time: `pending` holds its id while the call is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub(super) transcript: Transcript,
    pub(super) draft_input: String,
    pub(super) pending: Option<RequestId>,
    pub(super) last_error: Option<String>,
    pub(super) last_turn_id: u64,
    pub(super) last_request_id: u64,
}

impl SessionState {
    /// Creates an empty session: no turns, empty draft, idle, no error.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    /// True exactly while one remote call is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Id of the outstanding call, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a submit would be accepted right now.
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && !self.draft_input.trim().is_empty()
    }

    /// Whether the clear action should be offered.
    ///
    /// Clearing an empty transcript is allowed by the transition, but the
    /// renderer exposes the action only when there is something to clear.
    pub fn can_clear(&self) -> bool {
        !self.is_pending() && !self.transcript.is_empty()
    }

    pub(super) fn allocate_turn_id(&mut self) -> TurnId {
        self.last_turn_id += 1;
        TurnId(self.last_turn_id)
    }

    pub(super) fn allocate_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        RequestId(self.last_request_id)
    }
}

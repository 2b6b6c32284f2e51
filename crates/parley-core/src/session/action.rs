//! Inputs to the session transition.

use super::state::RequestId;
use crate::error::GenerationError;

/// Everything that can change a session.
///
/// The first three variants are user intents forwarded by the renderer; the
/// last two are settlements of an outstanding remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Replace the draft buffer verbatim. Trimming happens only on submit.
    EditDraft(String),
    /// Submit the current draft as a user turn.
    Submit,
    /// Drop every turn and the last error.
    ClearHistory,
    /// The call for `request` returned a reply.
    GenerationSucceeded { request: RequestId, reply: String },
    /// The call for `request` failed.
    GenerationFailed {
        request: RequestId,
        error: GenerationError,
    },
}

impl SessionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::EditDraft(_) => "edit_draft",
            SessionAction::Submit => "submit",
            SessionAction::ClearHistory => "clear_history",
            SessionAction::GenerationSucceeded { .. } => "generation_succeeded",
            SessionAction::GenerationFailed { .. } => "generation_failed",
        }
    }
}

/// Why an action left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Submit with an empty or whitespace-only draft.
    EmptyDraft,
    /// Submit while a call is outstanding.
    Pending,
    /// Clear-history while a call is outstanding.
    ClearWhilePending,
    /// A settlement that does not belong to the outstanding call.
    StaleSettlement,
}

impl std::fmt::Display for IgnoredReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IgnoredReason::EmptyDraft => "draft is empty",
            IgnoredReason::Pending => "a request is already pending",
            IgnoredReason::ClearWhilePending => "cannot clear while a request is pending",
            IgnoredReason::StaleSettlement => "settlement does not match the pending request",
        };
        f.write_str(text)
    }
}

//! The session transition function.
//!
//! `transition` is pure: it takes a state snapshot and an action and returns
//! the next snapshot together with the effects the caller must execute. Every
//! guard is enforced here; a disabled control in the renderer is only a hint.

use super::action::{IgnoredReason, SessionAction};
use super::effect::SessionEffect;
use super::state::{RequestId, SessionState};
use crate::error::EMPTY_REPLY_MESSAGE;
use crate::turn::Turn;

/// Fallback banner text when a failure carries no message of its own.
const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch response from the server.";

/// Whether an action changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    Ignored(IgnoredReason),
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The next state. Equal to the input state when the action was ignored.
    pub state: SessionState,
    /// Effects to execute, in order.
    pub effects: Vec<SessionEffect>,
    pub outcome: TransitionOutcome,
}

impl Transition {
    fn applied(state: SessionState, effects: Vec<SessionEffect>) -> Self {
        Self {
            state,
            effects,
            outcome: TransitionOutcome::Applied,
        }
    }

    fn ignored(state: &SessionState, reason: IgnoredReason) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
            outcome: TransitionOutcome::Ignored(reason),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, TransitionOutcome::Applied)
    }

    pub fn ignored_reason(&self) -> Option<IgnoredReason> {
        match self.outcome {
            TransitionOutcome::Applied => None,
            TransitionOutcome::Ignored(reason) => Some(reason),
        }
    }

    /// The generation request this transition dispatched, if any.
    pub fn dispatched_request(&self) -> Option<(RequestId, &str)> {
        self.effects.iter().find_map(|effect| match effect {
            SessionEffect::RequestGeneration { request, prompt } => {
                Some((*request, prompt.as_str()))
            }
            SessionEffect::ScrollToLatest => None,
        })
    }
}

/// Applies `action` to `state`.
pub fn transition(state: &SessionState, action: SessionAction) -> Transition {
    match action {
        SessionAction::EditDraft(text) => {
            let mut next = state.clone();
            next.draft_input = text;
            Transition::applied(next, Vec::new())
        }
        SessionAction::Submit => submit(state),
        SessionAction::ClearHistory => clear_history(state),
        SessionAction::GenerationSucceeded { request, reply } => {
            settle_success(state, request, reply)
        }
        SessionAction::GenerationFailed { request, error } => {
            settle_failure(state, request, error.user_message())
        }
    }
}

fn submit(state: &SessionState) -> Transition {
    if state.is_pending() {
        return Transition::ignored(state, IgnoredReason::Pending);
    }

    let mut next = state.clone();
    let turn_id = next.allocate_turn_id();
    let Some(turn) = Turn::user(turn_id, &state.draft_input) else {
        return Transition::ignored(state, IgnoredReason::EmptyDraft);
    };

    let request = next.allocate_request_id();
    let prompt = turn.text().to_string();

    next.transcript.push(turn);
    next.draft_input.clear();
    next.pending = Some(request);
    next.last_error = None;

    Transition::applied(
        next,
        vec![
            SessionEffect::ScrollToLatest,
            SessionEffect::RequestGeneration { request, prompt },
        ],
    )
}

fn clear_history(state: &SessionState) -> Transition {
    if state.is_pending() {
        return Transition::ignored(state, IgnoredReason::ClearWhilePending);
    }

    let mut next = state.clone();
    next.transcript.clear();
    next.last_error = None;
    Transition::applied(next, Vec::new())
}

fn settle_success(state: &SessionState, request: RequestId, reply: String) -> Transition {
    if state.pending != Some(request) {
        return Transition::ignored(state, IgnoredReason::StaleSettlement);
    }

    let mut next = state.clone();
    next.pending = None;

    let turn_id = next.allocate_turn_id();
    match Turn::assistant(turn_id, reply) {
        Some(turn) => {
            next.transcript.push(turn);
            Transition::applied(next, vec![SessionEffect::ScrollToLatest])
        }
        None => {
            next.last_error = Some(EMPTY_REPLY_MESSAGE.to_string());
            Transition::applied(next, Vec::new())
        }
    }
}

fn settle_failure(state: &SessionState, request: RequestId, message: String) -> Transition {
    if state.pending != Some(request) {
        return Transition::ignored(state, IgnoredReason::StaleSettlement);
    }

    let mut next = state.clone();
    next.pending = None;
    next.last_error = Some(if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    });
    Transition::applied(next, Vec::new())
}

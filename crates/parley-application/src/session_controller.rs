//! Conversation session controller.
//!
//! The controller runs as a single task that owns the [`SessionState`]. User
//! intents arrive through a [`SessionHandle`], go through
//! [`transition`](parley_core::session::transition) and the resulting effects
//! are executed here: generation requests are spawned against the
//! [`GenerationClient`] and their settlements come back through the same
//! mailbox, so state changes are applied one at a time in arrival order.
//!
//! The renderer never touches the state. It reads [`SessionSnapshot`]s from a
//! watch channel and receives [`RenderEffect`]s from a broadcast channel.
//!
//! # Teardown
//!
//! The controller stops once every handle is dropped. A call that settles
//! after that point finds the mailbox closed and its result is discarded.

use parley_core::error::GenerationError;
use parley_core::generation::GenerationClient;
use parley_core::session::{
    RequestId, SessionAction, SessionEffect, SessionState, TransitionOutcome, transition,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

const RENDER_EFFECT_CAPACITY: usize = 64;

/// Returned by handle operations once the controller has stopped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("session controller has shut down")]
pub struct SessionClosed;

/// Immutable view of the session published after every applied change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Incremented once per applied transition.
    pub revision: u64,
    pub state: SessionState,
}

impl SessionSnapshot {
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    pub fn can_clear(&self) -> bool {
        self.state.can_clear()
    }
}

/// Declarative effects for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEffect {
    /// The transcript grew; bring the newest turn into view.
    ScrollToLatest { revision: u64 },
}

/// What happened to one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionReport {
    pub outcome: TransitionOutcome,
    /// The call dispatched by this intent, if it started one.
    pub request: Option<RequestId>,
    /// Revision of the snapshot after the intent was handled.
    pub revision: u64,
}

impl ActionReport {
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, TransitionOutcome::Applied)
    }
}

struct Command {
    action: SessionAction,
    reply: Option<oneshot::Sender<ActionReport>>,
}

/// The task that owns the session state.
pub struct SessionController {
    state: SessionState,
    revision: u64,
    client: Arc<dyn GenerationClient>,
    commands: mpsc::UnboundedReceiver<Command>,
    mailbox: mpsc::WeakUnboundedSender<Command>,
    snapshots: watch::Sender<SessionSnapshot>,
    effects: broadcast::Sender<RenderEffect>,
}

impl SessionController {
    /// Creates a controller and the first handle to it.
    ///
    /// The controller does nothing until [`SessionController::run`] is polled;
    /// use [`SessionController::spawn`] to start it on the current runtime.
    pub fn new(client: Arc<dyn GenerationClient>) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let state = SessionState::new();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot {
            revision: 0,
            state: state.clone(),
        });
        let (effect_tx, _) = broadcast::channel(RENDER_EFFECT_CAPACITY);

        let controller = Self {
            state,
            revision: 0,
            client,
            commands: command_rx,
            mailbox: command_tx.downgrade(),
            snapshots: snapshot_tx,
            effects: effect_tx.clone(),
        };
        let handle = SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            effects: effect_tx,
        };
        (controller, handle)
    }

    /// Creates a controller and runs it as a background task.
    pub fn spawn(client: Arc<dyn GenerationClient>) -> SessionHandle {
        let (controller, handle) = Self::new(client);
        tokio::spawn(controller.run());
        handle
    }

    /// Processes intents and settlements until every handle is dropped.
    pub async fn run(mut self) {
        tracing::debug!("session controller started");
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }
        tracing::debug!(
            revision = self.revision,
            turns = self.state.transcript().len(),
            "session controller stopped"
        );
    }

    fn handle(&mut self, command: Command) {
        let Command { action, reply } = command;
        let action_name = action.name();
        log_settlement(&action);

        let result = transition(&self.state, action);
        let request = result.dispatched_request().map(|(request, _)| request);

        match result.outcome {
            TransitionOutcome::Ignored(reason) => {
                tracing::debug!(action = action_name, %reason, "action ignored");
            }
            TransitionOutcome::Applied => {
                self.state = result.state;
                self.revision += 1;
                self.publish();

                for effect in result.effects {
                    match effect {
                        SessionEffect::RequestGeneration { request, prompt } => {
                            self.dispatch(request, prompt);
                        }
                        SessionEffect::ScrollToLatest => {
                            // No receivers is fine: nothing is rendering.
                            let _ = self.effects.send(RenderEffect::ScrollToLatest {
                                revision: self.revision,
                            });
                        }
                    }
                }
            }
        }

        if let Some(reply) = reply {
            let _ = reply.send(ActionReport {
                outcome: result.outcome,
                request,
                revision: self.revision,
            });
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(SessionSnapshot {
            revision: self.revision,
            state: self.state.clone(),
        });
    }

    /// Starts the remote call for `request`.
    ///
    /// The call runs in its own task and reports back through a weak sender,
    /// so an outstanding call never keeps the controller alive.
    fn dispatch(&self, request: RequestId, prompt: String) {
        tracing::info!(%request, prompt_len = prompt.len(), "dispatching generation request");

        let client = Arc::clone(&self.client);
        let mailbox = self.mailbox.clone();

        tokio::spawn(async move {
            let call = tokio::spawn(async move { client.generate(&prompt).await });
            let action = match call.await {
                Ok(Ok(reply)) => SessionAction::GenerationSucceeded { request, reply },
                Ok(Err(error)) => SessionAction::GenerationFailed { request, error },
                Err(join_error) => SessionAction::GenerationFailed {
                    request,
                    error: GenerationError::transport(format!(
                        "generation task aborted: {join_error}"
                    )),
                },
            };

            match mailbox.upgrade() {
                Some(sender) => {
                    let _ = sender.send(Command {
                        action,
                        reply: None,
                    });
                }
                None => {
                    tracing::debug!(%request, "session ended before settlement; discarding");
                }
            }
        });
    }
}

fn log_settlement(action: &SessionAction) {
    match action {
        SessionAction::GenerationSucceeded { request, reply } => {
            tracing::info!(%request, reply_len = reply.len(), "generation succeeded");
        }
        SessionAction::GenerationFailed { request, error } => {
            tracing::warn!(%request, status = ?error.status(), "generation failed: {error}");
        }
        _ => {}
    }
}

/// Cloneable entry point for the renderer.
///
/// Every intent is answered with an [`ActionReport`] once the controller has
/// applied (or ignored) it.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    effects: broadcast::Sender<RenderEffect>,
}

impl SessionHandle {
    /// Replaces the draft buffer verbatim.
    pub async fn edit_draft(
        &self,
        text: impl Into<String>,
    ) -> Result<ActionReport, SessionClosed> {
        self.send(SessionAction::EditDraft(text.into())).await
    }

    /// Submits the current draft.
    ///
    /// Resolves as soon as the user turn is in the transcript; the remote call
    /// continues in the background.
    pub async fn submit(&self) -> Result<ActionReport, SessionClosed> {
        self.send(SessionAction::Submit).await
    }

    /// Submits the current draft and waits until its call has settled.
    ///
    /// Returns the current snapshot straight away when the submit was ignored.
    pub async fn submit_and_wait(&self) -> Result<SessionSnapshot, SessionClosed> {
        let report = self.submit().await?;
        let Some(request) = report.request else {
            return Ok(self.snapshot());
        };

        let mut snapshots = self.subscribe();
        let settled = snapshots
            .wait_for(|snapshot| snapshot.state.pending_request() != Some(request))
            .await
            .map_err(|_| SessionClosed)?;
        Ok(settled.clone())
    }

    /// Clears the transcript and the last error. Ignored while pending.
    pub async fn clear_history(&self) -> Result<ActionReport, SessionClosed> {
        self.send(SessionAction::ClearHistory).await
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn effects(&self) -> broadcast::Receiver<RenderEffect> {
        self.effects.subscribe()
    }

    async fn send(&self, action: SessionAction) -> Result<ActionReport, SessionClosed> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command {
                action,
                reply: Some(reply_tx),
            })
            .map_err(|_| SessionClosed)?;
        reply_rx.await.map_err(|_| SessionClosed)
    }
}

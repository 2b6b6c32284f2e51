//! Terminal rendering of session snapshots.

use colored::Colorize;
use parley_core::session::SessionState;
use parley_core::{Sender, Turn, TurnId};
use std::io::{self, Write};

pub const BUSY_INDICATOR: &str = "Assistant is thinking...";

/// Formats one transcript turn for the terminal.
pub fn format_turn(turn: &Turn) -> String {
    match turn.sender() {
        Sender::User => format!("{} {}", ">".green().bold(), turn.text().green()),
        Sender::Assistant => turn.text().bright_blue().to_string(),
    }
}

pub fn format_error(message: &str) -> String {
    format!("{} {}", "Error:".red().bold(), message.red())
}

/// Appends transcript turns to a terminal as they arrive.
///
/// The terminal keeps everything already printed, so the printer only
/// remembers the newest turn it has shown and prints the ones after it.
/// Turn ids keep increasing across a history clear.
pub struct TranscriptPrinter<W: Write> {
    out: W,
    last_shown: Option<TurnId>,
    echo_user_turns: bool,
}

impl<W: Write> TranscriptPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_shown: None,
            echo_user_turns: true,
        }
    }

    /// Whether user turns are printed. The line editor already leaves the
    /// typed text on screen, so the REPL turns this off.
    pub fn echo_user_turns(mut self, echo: bool) -> Self {
        self.echo_user_turns = echo;
        self
    }

    /// Prints every turn newer than the last one shown and returns how many
    /// were written.
    pub fn show_latest(&mut self, state: &SessionState) -> io::Result<usize> {
        let mut shown = 0;
        for turn in state.transcript() {
            if self.last_shown.is_some_and(|last| turn.id() <= last) {
                continue;
            }
            self.last_shown = Some(turn.id());
            if turn.sender() == Sender::User && !self.echo_user_turns {
                continue;
            }
            writeln!(self.out, "{}", format_turn(turn))?;
            shown += 1;
        }
        if shown > 0 {
            self.out.flush()?;
        }
        Ok(shown)
    }

    pub fn show_busy(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", BUSY_INDICATOR.bright_black().italic())?;
        self.out.flush()
    }

    /// Prints the error banner if the state carries an error.
    pub fn show_error(&mut self, state: &SessionState) -> io::Result<bool> {
        match state.last_error() {
            Some(message) => {
                writeln!(self.out, "{}", format_error(message))?;
                self.out.flush()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn show_note(&mut self, note: &str) -> io::Result<()> {
        writeln!(self.out, "{}", note.dimmed())?;
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::GenerationError;
    use parley_core::session::{RequestId, SessionAction, transition};

    fn plain() {
        colored::control::set_override(false);
    }

    fn submitted(state: &SessionState, text: &str) -> (SessionState, RequestId) {
        let edited = transition(state, SessionAction::EditDraft(text.to_string())).state;
        let result = transition(&edited, SessionAction::Submit);
        let (request, _) = result.dispatched_request().expect("submit dispatches");
        (result.state, request)
    }

    fn answered(state: &SessionState, request: RequestId, reply: &str) -> SessionState {
        transition(
            state,
            SessionAction::GenerationSucceeded {
                request,
                reply: reply.to_string(),
            },
        )
        .state
    }

    fn output(printer: TranscriptPrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_prints_each_turn_once() {
        plain();
        let mut printer = TranscriptPrinter::new(Vec::new());

        let (state, request) = submitted(&SessionState::new(), "Hello");
        assert_eq!(printer.show_latest(&state).unwrap(), 1);

        let state = answered(&state, request, "Hi there");
        assert_eq!(printer.show_latest(&state).unwrap(), 1);
        assert_eq!(printer.show_latest(&state).unwrap(), 0);

        assert_eq!(output(printer), "> Hello\nHi there\n");
    }

    #[test]
    fn test_user_turns_are_not_echoed_when_disabled() {
        plain();
        let mut printer = TranscriptPrinter::new(Vec::new()).echo_user_turns(false);

        let (state, request) = submitted(&SessionState::new(), "Hello");
        assert_eq!(printer.show_latest(&state).unwrap(), 0);

        let state = answered(&state, request, "Hi there");
        assert_eq!(printer.show_latest(&state).unwrap(), 1);
        assert_eq!(printer.show_latest(&state).unwrap(), 0);

        assert_eq!(output(printer), "Hi there\n");
    }

    #[test]
    fn test_turns_after_clear_are_printed() {
        plain();
        let mut printer = TranscriptPrinter::new(Vec::new());

        let (state, request) = submitted(&SessionState::new(), "first");
        let state = answered(&state, request, "one");
        printer.show_latest(&state).unwrap();

        let cleared = transition(&state, SessionAction::ClearHistory).state;
        assert_eq!(printer.show_latest(&cleared).unwrap(), 0);

        let (state, _) = submitted(&cleared, "second");
        assert_eq!(printer.show_latest(&state).unwrap(), 1);

        assert_eq!(output(printer), "> first\none\n> second\n");
    }

    #[test]
    fn test_error_banner() {
        plain();
        let mut printer = TranscriptPrinter::new(Vec::new());

        let (state, request) = submitted(&SessionState::new(), "Hello");
        assert!(!printer.show_error(&state).unwrap());

        let failed = transition(
            &state,
            SessionAction::GenerationFailed {
                request,
                error: GenerationError::from_status(500, Some("Internal Server Error")),
            },
        )
        .state;
        assert!(printer.show_error(&failed).unwrap());

        assert_eq!(
            output(printer),
            "Error: API Error: 500 Internal Server Error\n"
        );
    }

    #[test]
    fn test_assistant_text_is_printed_verbatim() {
        plain();
        let state = SessionState::new();
        let (state, request) = submitted(&state, "q");
        let state = answered(&state, request, "  line one\nline two  ");
        let turn = state.transcript().last().unwrap();
        assert_eq!(format_turn(turn), "  line one\nline two  ");
    }
}

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub const CLEAR_COMMAND: &str = "/clear";
pub const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Clear,
    /// Anything else becomes the draft and is submitted.
    Submit(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if QUIT_COMMANDS.contains(&trimmed) {
            ReplCommand::Quit
        } else if trimmed == CLEAR_COMMAND {
            ReplCommand::Clear
        } else {
            ReplCommand::Submit(line.to_string())
        }
    }
}

/// A slash command offered at the prompt.
struct CommandSpec {
    name: &'static str,
    summary: &'static str,
}

static COMMANDS: [CommandSpec; 3] = [
    CommandSpec {
        name: CLEAR_COMMAND,
        summary: "start over with an empty conversation",
    },
    CommandSpec {
        name: "/quit",
        summary: "leave parley",
    },
    CommandSpec {
        name: "/exit",
        summary: "leave parley",
    },
];

/// Prompt helper: slash-command completion, inline hints and highlighting.
///
/// Plain text is never completed or hinted; it is the draft.
#[derive(Clone, Default)]
pub struct CliHelper;

impl CliHelper {
    pub fn new() -> Self {
        Self
    }

    fn matching(prefix: &str) -> impl Iterator<Item = &'static CommandSpec> + '_ {
        COMMANDS.iter().filter(move |command| command.name.starts_with(prefix))
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if !typed.starts_with('/') || typed.contains(char::is_whitespace) {
            return Ok((0, Vec::new()));
        }

        let candidates = Self::matching(typed)
            .map(|command| Pair {
                display: format!("{:<8} {}", command.name, command.summary),
                replacement: command.name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let command = line.trim();
        if COMMANDS.iter().any(|known| known.name == command) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.dimmed().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    /// Completes the only matching command, or names what an exact command does.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with('/') {
            return None;
        }

        let mut matches = Self::matching(line);
        let command = matches.next()?;
        if matches.next().is_some() {
            return None;
        }

        if command.name == line {
            Some(format!("  {}", command.summary))
        } else {
            Some(command.name[line.len()..].to_string())
        }
    }
}

impl Validator for CliHelper {}

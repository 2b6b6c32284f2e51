mod helper;
mod renderer;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use helper::{CliHelper, ReplCommand};
use parley_application::{RenderEffect, SessionClosed, SessionController, SessionHandle};
use parley_infrastructure::ConfigService;
use parley_infrastructure::logging::{LogTarget, init_tracing};
use parley_interaction::HttpGenerationClient;
use renderer::TranscriptPrinter;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Cmd, Editor, EventHandler, KeyCode, KeyEvent, Modifiers};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Chat with a remote text-generation endpoint.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
struct Args {
    /// Generation endpoint, e.g. http://localhost:8000/generate
    #[arg(long)]
    endpoint: Option<String>,

    /// Configuration file (defaults to ~/.config/parley/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "parley_application=trace"
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

struct Repl {
    session: SessionHandle,
    effects: broadcast::Receiver<RenderEffect>,
    printer: TranscriptPrinter<Stdout>,
}

impl Repl {
    fn new(session: SessionHandle) -> Self {
        let effects = session.effects();
        Self {
            session,
            effects,
            printer: TranscriptPrinter::new(io::stdout()).echo_user_turns(false),
        }
    }

    /// Submits `line` and blocks the prompt until its call settles.
    async fn chat(&mut self, line: String) -> Result<()> {
        self.session.edit_draft(line).await?;
        let report = self.session.submit().await?;
        let Some(request) = report.request else {
            tracing::debug!(outcome = ?report.outcome, "submit did not start a call");
            return Ok(());
        };

        self.follow_effects()?;
        self.printer.show_busy()?;

        let settled = self
            .session
            .subscribe()
            .wait_for(|snapshot| snapshot.state.pending_request() != Some(request))
            .await
            .map_err(|_| SessionClosed)?
            .clone();

        self.follow_effects()?;
        self.printer.show_latest(&settled.state)?;
        self.printer.show_error(&settled.state)?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        if !self.session.snapshot().can_clear() {
            self.printer.show_note("Nothing to clear.")?;
            return Ok(());
        }

        let report = self.session.clear_history().await?;
        if report.is_applied() {
            self.printer.show_note("Conversation cleared.")?;
        }
        Ok(())
    }

    /// Brings the terminal up to the newest turn for every pending scroll request.
    fn follow_effects(&mut self) -> io::Result<()> {
        loop {
            match self.effects.try_recv() {
                Ok(RenderEffect::ScrollToLatest { .. }) | Err(TryRecvError::Lagged(_)) => {
                    self.printer.show_latest(&self.session.snapshot().state)?;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_service = match &args.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = config_service.load()?;
    if let Some(endpoint) = args.endpoint {
        config.client.endpoint = endpoint;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    let _log_guard = init_tracing(&config.logging, "parley", LogTarget::File)?;
    tracing::info!(endpoint = %config.client.endpoint, "starting parley");

    let client = HttpGenerationClient::from_config(&config.client)?;
    let mut repl = Repl::new(SessionController::spawn(Arc::new(client)));

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));
    rl.bind_sequence(
        KeyEvent(KeyCode::Enter, Modifiers::ALT),
        EventHandler::Simple(Cmd::Newline),
    );

    println!("{}", "=== Parley ===".bright_cyan().bold());
    println!("Connected to {}", config.client.endpoint.bright_white());
    println!(
        "{}",
        "Enter sends, Alt+Enter adds a line. /clear resets the conversation, /quit exits."
            .dimmed()
    );
    println!();

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match ReplCommand::parse(&line) {
                    ReplCommand::Quit => {
                        println!("Goodbye!");
                        break;
                    }
                    ReplCommand::Clear => repl.clear().await?,
                    ReplCommand::Submit(text) => repl.chat(text).await?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    tracing::info!("parley exited");
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use parley_infrastructure::ConfigService;
use parley_infrastructure::logging::{LogTarget, init_tracing};
use parley_interaction::GeminiApiAgent;
use parley_server::{AppState, TextGenerator, router};
use std::path::PathBuf;
use std::sync::Arc;

const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Serve `POST /generate` backed by the Gemini API.
#[derive(Parser, Debug)]
#[command(name = "parley-server", version, about)]
struct Args {
    /// Configuration file (defaults to ~/.config/parley/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(long)]
    port: Option<u16>,

    /// Log filter, e.g. "debug" or "parley_server=trace"
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_service = match &args.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = config_service.load()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging, "parley-server", LogTarget::Stderr)?;

    let server = config.server;
    let generator: Option<Arc<dyn TextGenerator>> = match std::env::var(API_KEY_ENV) {
        Ok(api_key) if !api_key.trim().is_empty() => {
            tracing::info!(model = %server.model, "Gemini API configured");
            let agent: Arc<dyn TextGenerator> =
                Arc::new(GeminiApiAgent::new(api_key, server.model.clone()));
            Some(agent)
        }
        _ => {
            tracing::error!(
                "{API_KEY_ENV} not found in environment variables; /generate will answer 503"
            );
            None
        }
    };

    let app = router(
        AppState::new(generator, server.system_prompt.clone()),
        &server.allowed_origins,
    );

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "serving generation endpoint");
    axum::serve(listener, app).await?;
    Ok(())
}

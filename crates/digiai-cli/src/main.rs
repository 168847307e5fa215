//! DigiAI CLI: entry point.
//!
//! # Commands
//!
//! - `digiai serve [--host H] [--port P]`: run the HTTP relay
//! - `digiai ask [-m MESSAGE]`: ask one question, or chat in a REPL
//! - `digiai status`: show configuration and backend status
//! - `digiai onboard`: write the default config file

mod helpers;
mod onboard;
mod repl;
mod serve;
mod status;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use digiai_core::config::{load_config, Config};
use digiai_core::Persona;
use digiai_providers::create_provider;
use digiai_relay::RelayHandler;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// DigiAI: support assistant relay for the DigiPurse wallet
#[derive(Parser)]
#[command(name = "digiai", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve /chat, /query and /health over HTTP
    Serve {
        /// Address to bind (overrides config `server.host`)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config `server.port`)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,

        /// Emit logs as JSON lines
        #[arg(long, default_value_t = false)]
        json_logs: bool,
    },

    /// Ask the assistant (single-shot or interactive REPL)
    Ask {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and backend status
    Status,

    /// Write the default configuration file
    Onboard,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            logs,
            json_logs,
        } => {
            init_logging(LogMode::server(logs, json_logs));
            log_dotenv(dotenv);
            serve::run(host, port).await
        }
        Commands::Ask { message, logs } => {
            init_logging(LogMode::interactive(logs));
            log_dotenv(dotenv);
            run_ask(message).await
        }
        Commands::Status => status::run(),
        Commands::Onboard => onboard::run(),
    }
}

fn log_dotenv(path: Option<std::path::PathBuf>) {
    if let Some(path) = path {
        debug!("loaded environment from {}", path.display());
    }
}

// ─────────────────────────────────────────────
// Ask command
// ─────────────────────────────────────────────

async fn run_ask(message: Option<String>) -> Result<()> {
    let config = load_config(None);
    let relay = build_relay(&config)?;

    match message {
        Some(msg) => {
            let response = relay
                .handle_text(&msg)
                .await
                .context("nothing to ask")?;
            helpers::print_response(&response.answer);
        }
        None => repl::run(&relay).await?,
    }

    Ok(())
}

/// Wire a relay handler from configuration.
///
/// Fails if the persona cannot be loaded or the selected backend is missing
/// credentials; nothing is served in that case.
pub fn build_relay(config: &Config) -> Result<RelayHandler> {
    let persona = Persona::from_config(&config.persona).context("failed to load persona")?;
    let provider = create_provider(config).context("failed to create LLM provider")?;

    let relay = RelayHandler::new(provider, persona);
    let relay = match config.generation.request_timeout_secs {
        0 => relay,
        secs => relay.with_timeout(Duration::from_secs(secs)),
    };

    Ok(relay)
}

// ─────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────

/// How the subscriber is set up for a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LogMode {
    /// Filter used when `RUST_LOG` is unset.
    default_filter: &'static str,
    json: bool,
}

impl LogMode {
    fn server(verbose: bool, json: bool) -> Self {
        LogMode {
            default_filter: if verbose {
                "digiai=debug,tower_http=debug,info"
            } else {
                "info"
            },
            json,
        }
    }

    fn interactive(verbose: bool) -> Self {
        LogMode {
            default_filter: if verbose { "digiai=debug,info" } else { "warn" },
            json: false,
        }
    }
}

/// Initialize tracing/logging. `RUST_LOG` takes precedence over the mode's filter.
fn init_logging(mode: LogMode) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(mode.default_filter));

    if mode.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

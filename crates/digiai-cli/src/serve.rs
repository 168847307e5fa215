//! `digiai serve`: run the HTTP relay.

use anyhow::{Context, Result};
use colored::Colorize;

use digiai_core::config::load_config;
use digiai_gateway::AppState;

use crate::build_relay;

/// Run the serve command.
pub async fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(None);
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let relay = build_relay(&config)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    println!();
    println!(
        "  {} on {}",
        "DigiAI relay".cyan().bold(),
        format!("http://{addr}").cyan()
    );
    println!(
        "  {}",
        format!(
            "{} · {}",
            relay.provider().display_name(),
            relay.provider().model()
        )
        .dimmed()
    );
    println!("  {}", "Press Ctrl+C to stop".dimmed());
    println!();

    digiai_gateway::serve(addr.as_str(), AppState::new(relay))
        .await
        .with_context(|| format!("server on {addr} failed"))?;

    println!("\n  Server stopped.");
    Ok(())
}

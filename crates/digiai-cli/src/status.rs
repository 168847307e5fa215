//! `digiai status`: show configuration and backend status.

use anyhow::Result;
use colored::Colorize;

use digiai_core::config::{get_config_path, load_config, Config};
use digiai_core::Persona;
use digiai_providers::registry::{find_by_name, is_configured};
use digiai_providers::PROVIDERS;

use crate::helpers::mark;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "DigiAI Status".cyan().bold());
    println!();

    println!(
        "  {:<14} {} {}",
        "Config:".bold(),
        config_path.display(),
        mark(config_path.exists(), "", "(not found)")
    );

    let backend = find_by_name(&config.provider)
        .map(|spec| spec.display_name.to_string())
        .unwrap_or_else(|| format!("{} (unknown)", config.provider).red().to_string());
    println!("  {:<14} {}", "Backend:".bold(), backend);
    println!("  {:<14} {}", "Model:".bold(), selected_model(&config));

    let generation = &config.generation;
    println!(
        "  {:<14} {}",
        "Parameters:".bold(),
        format!(
            "max_tokens: {} | temp: {} | top_p: {} | timeout: {}s",
            generation.max_tokens,
            generation.temperature,
            generation.top_p.map_or_else(|| "-".to_string(), |p| p.to_string()),
            generation.request_timeout_secs
        )
        .dimmed()
    );
    println!(
        "  {:<14} {}",
        "Server:".bold(),
        format!("{}:{}", config.server.host, config.server.port)
    );

    println!();
    println!("  {}", "Backends:".bold());
    for spec in PROVIDERS {
        let selected = if spec.name.eq_ignore_ascii_case(config.provider.trim()) {
            "*"
        } else {
            " "
        };
        println!(
            "  {} {:<16} {}",
            selected,
            spec.display_name,
            mark(
                is_configured(spec, &config.providers),
                "(configured)",
                &format!("not configured ({})", spec.env_key)
            )
        );
    }

    println!();
    println!("  {:<14} {}", "Persona:".bold(), persona_summary(&config));
    println!();

    Ok(())
}

fn selected_model(config: &Config) -> String {
    match config.provider.trim().to_ascii_lowercase().as_str() {
        "azure" => config.providers.azure.deployment.clone(),
        "openai" => config.providers.openai.model.clone(),
        "gemini" => config.providers.gemini.model.clone(),
        _ => "-".to_string(),
    }
}

/// Where the persona comes from and how long it is.
fn persona_summary(config: &Config) -> String {
    let source = match (&config.persona.text, &config.persona.file) {
        (Some(_), _) => "inline".to_string(),
        (None, Some(file)) => file.clone(),
        (None, None) => "built-in".to_string(),
    };

    match Persona::from_config(&config.persona) {
        Ok(persona) => format!("{source} ({} chars)", persona.len()),
        Err(e) => format!("{source} {}", format!("({e})").red()),
    }
}

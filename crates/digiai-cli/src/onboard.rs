//! `digiai onboard`: write the default configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use digiai_core::config::{get_config_path, save_config, Config};
use digiai_core::utils::get_history_path;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "DigiAI Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    if let Some(history_dir) = get_history_path().parent() {
        std::fs::create_dir_all(history_dir)
            .with_context(|| format!("failed to create {}", history_dir.display()))?;
    }

    println!();
    println!(
        "  Add your backend credentials to the config file or export {}.",
        "AZURE_OPENAI_API_KEY".bold()
    );
    println!(
        "{}",
        "  Then run `digiai status` to check, and `digiai serve` to start.".green()
    );
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

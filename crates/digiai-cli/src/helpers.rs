//! Shared CLI helpers: response printing, banner, status markers.

use colored::Colorize;

/// Print an answer to stdout.
pub fn print_response(answer: &str) {
    println!();
    println!("{}", "DigiAI".cyan().bold());
    println!("{answer}");
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner(backend: &str, model: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "DigiAI".cyan().bold(), version.dimmed());
    println!("{}", format!("{backend} · {model}").dimmed());
    println!("{}", "Ask a question, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" placeholder.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// Green check or dimmed placeholder, for status listings.
pub fn mark(ok: bool, ok_text: &str, missing_text: &str) -> String {
    if ok {
        format!("{} {}", "✓".green(), ok_text)
    } else {
        format!("{}", format!("· {missing_text}").dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_texts() {
        colored::control::set_override(false);
        assert_eq!(mark(true, "(key set)", "not configured"), "✓ (key set)");
        assert_eq!(mark(false, "(key set)", "not configured"), "· not configured");
    }
}

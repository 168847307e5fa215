//! Config loader: reads `~/.digiai/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.digiai/config.json`
//! 3. Provider-native environment variables (`AZURE_OPENAI_API_KEY`, `GEMINI_API_KEY`, …)
//! 4. Environment variables `DIGIAI_<SECTION>__<FIELD>`

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
/// Missing credentials are not detected here; provider construction does that.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply process environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_env_overrides_with(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Supported overrides:
/// - `AZURE_OPENAI_API_KEY` / `AZURE_OPENAI_KEY` → `providers.azure.api_key`
/// - `AZURE_OPENAI_ENDPOINT` → `providers.azure.endpoint`
/// - `AZURE_OPENAI_DEPLOYMENT_NAME` → `providers.azure.deployment`
/// - `AZURE_OPENAI_API_VERSION` → `providers.azure.api_version`
/// - `OPENAI_API_KEY` → `providers.openai.api_key`
/// - `GEMINI_API_KEY` → `providers.gemini.api_key`
/// - `DIGIAI_PROVIDER` → `provider`
/// - `DIGIAI_PROVIDERS__<NAME>__<FIELD>` → `providers.<name>.<field>`
/// - `DIGIAI_GENERATION__MAX_TOKENS` / `__TEMPERATURE` / `__TOP_P` / `__REQUEST_TIMEOUT_SECS`
/// - `DIGIAI_PERSONA__TEXT` / `DIGIAI_PERSONA__FILE`
/// - `DIGIAI_SERVER__HOST` / `DIGIAI_SERVER__PORT`
pub fn apply_env_overrides_with<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // Provider-native names
    let azure = &mut config.providers.azure;
    if let Some(val) = lookup("AZURE_OPENAI_API_KEY").or_else(|| lookup("AZURE_OPENAI_KEY")) {
        azure.api_key = val;
    }
    if let Some(val) = lookup("AZURE_OPENAI_ENDPOINT") {
        azure.endpoint = val;
    }
    if let Some(val) = lookup("AZURE_OPENAI_DEPLOYMENT_NAME") {
        azure.deployment = val;
    }
    if let Some(val) = lookup("AZURE_OPENAI_API_VERSION") {
        azure.api_version = val;
    }
    if let Some(val) = lookup("OPENAI_API_KEY") {
        config.providers.openai.api_key = val;
    }
    if let Some(val) = lookup("GEMINI_API_KEY") {
        config.providers.gemini.api_key = val;
    }

    // Backend selection
    if let Some(val) = lookup("DIGIAI_PROVIDER") {
        config.provider = val;
    }

    // Azure
    let azure = &mut config.providers.azure;
    if let Some(val) = lookup("DIGIAI_PROVIDERS__AZURE__API_KEY") {
        azure.api_key = val;
    }
    if let Some(val) = lookup("DIGIAI_PROVIDERS__AZURE__ENDPOINT") {
        azure.endpoint = val;
    }
    if let Some(val) = lookup("DIGIAI_PROVIDERS__AZURE__DEPLOYMENT") {
        azure.deployment = val;
    }
    if let Some(val) = lookup("DIGIAI_PROVIDERS__AZURE__API_VERSION") {
        azure.api_version = val;
    }

    // OpenAI-compatible
    let openai = &mut config.providers.openai;
    if let Some(val) = lookup("DIGIAI_PROVIDERS__OPENAI__API_KEY") {
        openai.api_key = val;
    }
    if let Some(val) = lookup("DIGIAI_PROVIDERS__OPENAI__API_BASE") {
        openai.api_base = Some(val);
    }
    if let Some(val) = lookup("DIGIAI_PROVIDERS__OPENAI__MODEL") {
        openai.model = val;
    }

    // Gemini
    let gemini = &mut config.providers.gemini;
    if let Some(val) = lookup("DIGIAI_PROVIDERS__GEMINI__API_KEY") {
        gemini.api_key = val;
    }
    if let Some(val) = lookup("DIGIAI_PROVIDERS__GEMINI__API_BASE") {
        gemini.api_base = Some(val);
    }
    if let Some(val) = lookup("DIGIAI_PROVIDERS__GEMINI__MODEL") {
        gemini.model = val;
    }
    if let Some(val) = lookup("DIGIAI_PROVIDERS__GEMINI__WEB_SEARCH") {
        gemini.web_search = parse_bool(&val);
    }

    // Generation
    let generation = &mut config.generation;
    if let Some(n) = lookup("DIGIAI_GENERATION__MAX_TOKENS").and_then(|v| v.parse().ok()) {
        generation.max_tokens = n;
    }
    if let Some(t) = lookup("DIGIAI_GENERATION__TEMPERATURE").and_then(|v| v.parse().ok()) {
        generation.temperature = t;
    }
    if let Some(p) = lookup("DIGIAI_GENERATION__TOP_P").and_then(|v| v.parse().ok()) {
        generation.top_p = Some(p);
    }
    if let Some(s) = lookup("DIGIAI_GENERATION__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        generation.request_timeout_secs = s;
    }

    // Persona
    if let Some(val) = lookup("DIGIAI_PERSONA__TEXT") {
        config.persona.text = Some(val);
    }
    if let Some(val) = lookup("DIGIAI_PERSONA__FILE") {
        config.persona.file = Some(val);
    }

    // Server
    if let Some(val) = lookup("DIGIAI_SERVER__HOST") {
        config.server.host = val;
    }
    if let Some(p) = lookup("DIGIAI_SERVER__PORT").and_then(|v| v.parse().ok()) {
        config.server.port = p;
    }

    config
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.provider, "azure");
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "provider": "openai",
            "providers": {
                "openai": { "apiKey": "sk-123", "model": "gpt-4o" }
            },
            "generation": { "maxTokens": 400 }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.provider, "openai");
        assert_eq!(config.providers.openai.api_key, "sk-123");
        assert_eq!(config.providers.openai.model, "gpt-4o");
        assert_eq!(config.generation.max_tokens, 400);
        // Default preserved
        assert_eq!(config.generation.temperature, 0.7);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.generation.max_tokens, 256);
        assert!(!config.providers.azure.is_configured());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.provider = "gemini".to_string();
        config.providers.gemini.api_key = "g-test".to_string();
        config.persona.file = Some("~/persona.md".to_string());

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.provider, "gemini");
        assert_eq!(reloaded.providers.gemini.api_key, "g-test");
        assert_eq!(reloaded.persona.file.as_deref(), Some("~/persona.md"));
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["generation"].get("maxTokens").is_some());
        assert!(raw["generation"].get("max_tokens").is_none());
    }

    #[test]
    fn test_native_azure_env_names() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[
                ("AZURE_OPENAI_KEY", "azure-key"),
                ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
                ("AZURE_OPENAI_DEPLOYMENT_NAME", "support-bot"),
            ]),
        );
        let azure = &config.providers.azure;
        assert_eq!(azure.api_key, "azure-key");
        assert_eq!(azure.endpoint, "https://res.openai.azure.com");
        assert_eq!(azure.deployment, "support-bot");
        assert!(azure.is_configured());
    }

    #[test]
    fn test_api_key_name_preferred_over_legacy_key_name() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[
                ("AZURE_OPENAI_API_KEY", "new"),
                ("AZURE_OPENAI_KEY", "old"),
            ]),
        );
        assert_eq!(config.providers.azure.api_key, "new");
    }

    #[test]
    fn test_prefixed_env_beats_native() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[
                ("GEMINI_API_KEY", "native"),
                ("DIGIAI_PROVIDERS__GEMINI__API_KEY", "prefixed"),
                ("DIGIAI_PROVIDERS__GEMINI__WEB_SEARCH", "false"),
                ("DIGIAI_PROVIDER", "gemini"),
            ]),
        );
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.providers.gemini.api_key, "prefixed");
        assert!(!config.providers.gemini.web_search);
    }

    #[test]
    fn test_env_override_generation_and_server() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[
                ("DIGIAI_GENERATION__MAX_TOKENS", "400"),
                ("DIGIAI_GENERATION__TOP_P", "0.5"),
                ("DIGIAI_GENERATION__REQUEST_TIMEOUT_SECS", "5"),
                ("DIGIAI_SERVER__PORT", "9999"),
                ("DIGIAI_PERSONA__TEXT", "You are Digi."),
            ]),
        );
        assert_eq!(config.generation.max_tokens, 400);
        assert_eq!(config.generation.top_p, Some(0.5));
        assert_eq!(config.generation.request_timeout_secs, 5);
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.persona.text.as_deref(), Some("You are Digi."));
    }

    #[test]
    fn test_unparsable_numbers_ignored() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[
                ("DIGIAI_GENERATION__MAX_TOKENS", "lots"),
                ("DIGIAI_SERVER__PORT", "99999"),
            ]),
        );
        assert_eq!(config.generation.max_tokens, 256);
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("YES"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
    }
}

//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig`, `GenerationConfig`,
//! `PersonaConfig`, `ServerConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.
//! Every field has a default, so a partial (or empty) file is valid.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.digiai/config.json` + env vars.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Which backend answers questions: `"azure"`, `"openai"`, or `"gemini"`.
    pub provider: String,
    pub providers: ProvidersConfig,
    pub generation: GenerationConfig,
    pub persona: PersonaConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: "azure".to_string(),
            providers: ProvidersConfig::default(),
            generation: GenerationConfig::default(),
            persona: PersonaConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Credentials and endpoints for every supported backend.
///
/// Only the section named by `Config::provider` has to be filled in.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub azure: AzureConfig,
    pub openai: OpenAiConfig,
    pub gemini: GeminiConfig,
}

/// A required string setting counts as present when it has non-whitespace text.
fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Azure OpenAI deployment settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureConfig {
    pub api_key: String,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    /// Deployment name (used as the model identifier).
    pub deployment: String,
    pub api_version: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            deployment: "digipurse-ai".to_string(),
            api_version: "2024-02-01".to_string(),
        }
    }
}

impl AzureConfig {
    pub fn is_configured(&self) -> bool {
        is_set(&self.api_key)
            && is_set(&self.endpoint)
            && is_set(&self.deployment)
            && is_set(&self.api_version)
    }
}

/// Any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Custom API base URL (defaults to `https://api.openai.com/v1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

impl OpenAiConfig {
    pub fn is_configured(&self) -> bool {
        is_set(&self.api_key) && is_set(&self.model)
    }
}

/// Google Gemini `generateContent` settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Custom API base URL (defaults to the public v1beta endpoint).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub model: String,
    /// Let the model ground answers with Google Search.
    pub web_search: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            model: "gemini-2.0-flash".to_string(),
            web_search: true,
        }
    }
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        is_set(&self.api_key) && is_set(&self.model)
    }
}

// ─────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────

/// Sampling parameters and the outbound call budget.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Maximum tokens to generate per answer.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Nucleus sampling; omitted from the request when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Upper bound on one provider call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: 0.7,
            top_p: Some(0.95),
            request_timeout_secs: 30,
        }
    }
}

// ─────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────

/// Where the system instruction comes from.
///
/// Both unset means the built-in DigiAI persona.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonaConfig {
    /// Inline persona text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Path to a file holding the persona text (`~` is expanded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// HTTP listener configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

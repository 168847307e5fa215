//! Provider registry: static specs for the supported backends and the
//! factory that turns a [`Config`] into a ready provider.
//!
//! Construction is the startup gate: a backend with missing credentials is
//! rejected here, before the server binds a socket.

use std::sync::Arc;

use tracing::debug;

use digiai_core::config::{Config, ProvidersConfig};
use digiai_core::ConfigError;

use crate::chat_completions::ChatCompletionsProvider;
use crate::gemini::GeminiProvider;
use crate::http::build_client;
use crate::traits::{LlmProvider, LlmRequestConfig};

// ─────────────────────────────────────────────
// ProviderSpec: static metadata for one backend
// ─────────────────────────────────────────────

/// Which adapter implementation a backend uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Azure,
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// The static spec for this backend.
    pub fn spec(self) -> &'static ProviderSpec {
        match self {
            ProviderKind::Azure => &AZURE,
            ProviderKind::OpenAi => &OPENAI,
            ProviderKind::Gemini => &GEMINI,
        }
    }
}

/// Static specification describing one backend.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    pub kind: ProviderKind,
    /// Config name (e.g. `"azure"`), matched against `Config::provider`.
    pub name: &'static str,
    /// Human-readable name for logs. E.g. `"Azure OpenAI"`.
    pub display_name: &'static str,
    /// Environment variable carrying the API key.
    pub env_key: &'static str,
    /// Default API base URL, if the backend has a public one.
    pub default_api_base: Option<&'static str>,
}

pub static AZURE: ProviderSpec = ProviderSpec {
    kind: ProviderKind::Azure,
    name: "azure",
    display_name: "Azure OpenAI",
    env_key: "AZURE_OPENAI_API_KEY",
    default_api_base: None,
};

pub static OPENAI: ProviderSpec = ProviderSpec {
    kind: ProviderKind::OpenAi,
    name: "openai",
    display_name: "OpenAI",
    env_key: "OPENAI_API_KEY",
    default_api_base: Some("https://api.openai.com/v1"),
};

pub static GEMINI: ProviderSpec = ProviderSpec {
    kind: ProviderKind::Gemini,
    name: "gemini",
    display_name: "Gemini",
    env_key: "GEMINI_API_KEY",
    default_api_base: Some("https://generativelanguage.googleapis.com/v1beta"),
};

/// All supported backends, in display order.
pub static PROVIDERS: &[&ProviderSpec] = &[&AZURE, &OPENAI, &GEMINI];

/// Find a backend by config name (case-insensitive).
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    let name = name.trim();
    PROVIDERS
        .iter()
        .copied()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// Whether the config section for `spec` has everything it needs.
pub fn is_configured(spec: &ProviderSpec, providers: &ProvidersConfig) -> bool {
    match spec.kind {
        ProviderKind::Azure => providers.azure.is_configured(),
        ProviderKind::OpenAi => providers.openai.is_configured(),
        ProviderKind::Gemini => providers.gemini.is_configured(),
    }
}

/// Reject a blank required setting.
pub(crate) fn require(
    value: &str,
    spec: &ProviderSpec,
    field: &'static str,
    env_hint: &'static str,
) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing {
            backend: spec.display_name,
            field,
            env_hint,
        });
    }
    Ok(())
}

/// Reject a request URL that reqwest could not send to.
pub(crate) fn require_url(
    url: &str,
    spec: &ProviderSpec,
    field: &'static str,
) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        backend: spec.display_name,
        field,
        url: url.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https".to_string()));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

/// Treat a blank optional setting as unset.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────
// Factory
// ─────────────────────────────────────────────

/// Build the provider selected by `config.provider`.
///
/// This is the main entry point. The HTTP client is created once here with
/// the configured request timeout and owned by the returned provider.
pub fn create_provider(config: &Config) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    let spec = find_by_name(&config.provider)
        .ok_or_else(|| ConfigError::UnknownBackend(config.provider.clone()))?;

    let client = build_client(config.generation.request_timeout_secs)?;
    let params = LlmRequestConfig::from(&config.generation);

    let provider: Arc<dyn LlmProvider> = match spec.kind {
        ProviderKind::Azure => Arc::new(ChatCompletionsProvider::azure(
            &config.providers.azure,
            params,
            client,
        )?),
        ProviderKind::OpenAi => Arc::new(ChatCompletionsProvider::openai(
            &config.providers.openai,
            params,
            client,
        )?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            &config.providers.gemini,
            params,
            client,
        )?),
    };

    debug!(
        provider = provider.display_name(),
        model = provider.model(),
        timeout_secs = config.generation.request_timeout_secs,
        "Created LLM provider"
    );

    Ok(provider)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

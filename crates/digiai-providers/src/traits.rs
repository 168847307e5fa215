//! LLM Provider trait: the one capability the relay depends on.
//!
//! Every backend (Azure OpenAI, OpenAI-compatible, Gemini, test doubles)
//! implements this trait. New backends are added here, never in the relay.

use async_trait::async_trait;
use digiai_core::config::GenerationConfig;

use crate::error::ProviderFailure;

/// Sampling parameters passed with each call.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Nucleus sampling, omitted when `None`.
    pub top_p: Option<f64>,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: 0.7,
            top_p: Some(0.95),
        }
    }
}

impl From<&GenerationConfig> for LlmRequestConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Answer one user message under the given system instruction.
    ///
    /// Performs exactly one outbound call. Every backend error is returned
    /// as a [`ProviderFailure`]; this method never panics on backend input.
    /// `user_message` is passed through as-is, validation is the caller's job.
    async fn generate(&self, persona: &str, user_message: &str)
        -> Result<String, ProviderFailure>;

    /// Model or deployment identifier, for logs and status output.
    fn model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

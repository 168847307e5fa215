//! LLM provider layer for DigiAI.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`]: the one capability every backend implements
//! - [`error::ProviderFailure`]: typed failure returned by every adapter
//! - [`chat_completions::ChatCompletionsProvider`]: Azure OpenAI and OpenAI-compatible APIs
//! - [`gemini::GeminiProvider`]: Google Gemini `generateContent`, optionally search-grounded
//! - [`registry`]: static backend specs + [`registry::create_provider`] from config

pub mod chat_completions;
pub mod error;
pub mod gemini;
mod http;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use chat_completions::ChatCompletionsProvider;
pub use error::ProviderFailure;
pub use gemini::GeminiProvider;
pub use registry::{create_provider, ProviderKind, ProviderSpec, PROVIDERS};
pub use traits::{LlmProvider, LlmRequestConfig};

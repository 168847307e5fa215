//! Startup configuration errors.
//!
//! A `ConfigError` is always fatal: it is raised while wiring the process
//! together and stops the server before any socket is bound.

use std::path::PathBuf;

/// Missing or invalid startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting for the selected backend is empty.
    #[error("{backend} is not configured: `{field}` is missing (set it in config.json or via {env_hint})")]
    Missing {
        backend: &'static str,
        field: &'static str,
        env_hint: &'static str,
    },

    /// The configured backend name is not one we know how to build.
    #[error("unknown provider backend '{0}' (expected one of: azure, openai, gemini)")]
    UnknownBackend(String),

    /// A configured URL cannot be used to send requests.
    #[error("{backend} has an unusable `{field}` URL '{url}': {reason}")]
    InvalidUrl {
        backend: &'static str,
        field: &'static str,
        url: String,
        reason: String,
    },

    /// The persona text resolved to an empty string.
    #[error("persona is empty")]
    EmptyPersona,

    /// The persona file could not be read.
    #[error("failed to read persona file {path}: {source}")]
    PersonaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

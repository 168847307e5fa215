//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use digiai_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Provider: {}", cfg.provider);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{apply_env_overrides, get_config_path, load_config, save_config};
pub use schema::{
    AzureConfig, Config, GeminiConfig, GenerationConfig, OpenAiConfig, PersonaConfig,
    ProvidersConfig, ServerConfig,
};

//! DigiAI Core: shared types, persona, configuration, and utilities.
//!
//! This crate contains:
//! - **types**: chat-completions wire format and the relay's request/response values
//! - **persona**: the immutable system instruction shared by every request
//! - **config**: JSON schema, loader, and env var overrides
//! - **error**: startup configuration errors

pub mod config;
pub mod error;
pub mod persona;
pub mod types;
pub mod utils;

pub use error::ConfigError;
pub use persona::Persona;
pub use types::{ChatRequest, ChatResponse};

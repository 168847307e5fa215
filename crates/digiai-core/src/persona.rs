//! The persona: the fixed system instruction sent with every question.
//!
//! Resolved once at startup from `persona.text`, `persona.file`, or the
//! built-in DigiAI prompt, then shared read-only across all requests.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::schema::PersonaConfig;
use crate::error::ConfigError;
use crate::utils::expand_home;

/// Built-in DigiAI support persona.
pub const DIGIAI_PERSONA: &str = "\
You are DigiAI, an AI support assistant for DigiPurse — a decentralized Web3 app on ICP.
Help users with:
- Managing DIDs & VCs (like digital IDs and verified credentials)
- NFT ticketing (how to buy, transfer, avoid scams)
- P2P payments (secure, fast, no intermediaries)
- Account help, security, troubleshooting
- Benefits of blockchain: privacy, sovereignty, transparency

Be friendly, clear, and educational. Never give financial advice. Guide, don't control.
Always remind users: 'You own your data. No one can take it — including us.'";

/// Immutable system instruction. Cloning shares the same allocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Persona(Arc<str>);

impl Persona {
    /// Wrap a persona text. Surrounding whitespace is trimmed.
    pub fn new(text: &str) -> Result<Self, ConfigError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyPersona);
        }
        Ok(Persona(Arc::from(trimmed)))
    }

    /// The built-in DigiAI persona.
    pub fn builtin() -> Self {
        Persona(Arc::from(DIGIAI_PERSONA))
    }

    /// Resolve the persona from configuration.
    ///
    /// Precedence: inline `text`, then `file`, then the built-in persona.
    pub fn from_config(config: &PersonaConfig) -> Result<Self, ConfigError> {
        if let Some(ref text) = config.text {
            debug!("using inline persona from config");
            return Persona::new(text);
        }

        if let Some(ref file) = config.file {
            let path = expand_home(file);
            debug!("loading persona from {}", path.display());
            let text = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::PersonaFile { path, source })?;
            return Persona::new(&text);
        }

        Ok(Persona::builtin())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persona").field("len", &self.0.len()).finish()
    }
}

impl AsRef<str> for Persona {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

//! Relay handler: one question in, one answer out.
//!
//! The handler owns the persona and a shared provider. Provider failures
//! are logged and replaced by [`FALLBACK_ANSWER`]; a request that parses is
//! always answered with `helpful: true`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use digiai_core::types::{ChatRequest, ChatResponse};
use digiai_core::utils::truncate_string;
use digiai_core::Persona;
use digiai_providers::{LlmProvider, ProviderFailure};

use crate::request::{parse_request, request_from_text, InputError, RequestField};

/// Answer returned whenever the provider fails.
pub const FALLBACK_ANSWER: &str =
    "Sorry, I'm currently unable to process your request. Please try again later.";

/// Characters of the user's message kept in logs.
const LOG_PREVIEW_CHARS: usize = 120;

/// Connects inbound questions to the provider.
///
/// Cheap to share behind an `Arc`; nothing in it is mutated after construction.
pub struct RelayHandler {
    provider: Arc<dyn LlmProvider>,
    persona: Persona,
    /// Upper bound on one provider call.
    timeout: Option<Duration>,
}

impl std::fmt::Debug for RelayHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayHandler")
            .field("provider", &self.provider.display_name())
            .field("model", &self.provider.model())
            .field("persona", &self.persona)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RelayHandler {
    pub fn new(provider: Arc<dyn LlmProvider>, persona: Persona) -> Self {
        RelayHandler {
            provider,
            persona,
            timeout: None,
        }
    }

    /// Bound every provider call. Expiry counts as a provider failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Parse a raw payload and relay it.
    ///
    /// Returns `Err` only for bad input; the provider is not called in that case.
    pub async fn handle_payload(
        &self,
        payload: &[u8],
        field: RequestField,
    ) -> Result<ChatResponse, InputError> {
        let request = parse_request(payload, field).map_err(|e| {
            warn!(field = field.name(), reason = ?e.reason, "rejected request");
            e
        })?;
        Ok(self.relay(request).await)
    }

    /// Relay plain text, as typed on the command line.
    pub async fn handle_text(&self, text: &str) -> Result<ChatResponse, InputError> {
        let request = request_from_text(text, RequestField::Message)?;
        Ok(self.relay(request).await)
    }

    /// Ask the provider and wrap its answer. Never fails.
    pub async fn relay(&self, request: ChatRequest) -> ChatResponse {
        info!(
            provider = self.provider.display_name(),
            message = %truncate_string(&request.message, LOG_PREVIEW_CHARS),
            "relaying question"
        );

        match self.generate(&request.message).await {
            Ok(answer) => {
                debug!(chars = answer.len(), "answer received");
                ChatResponse::answer(answer)
            }
            Err(failure) => {
                error!(
                    provider = self.provider.display_name(),
                    model = self.provider.model(),
                    kind = failure.kind(),
                    error = %failure,
                    "provider failure, returning fallback answer"
                );
                ChatResponse::answer(FALLBACK_ANSWER)
            }
        }
    }

    async fn generate(&self, message: &str) -> Result<String, ProviderFailure> {
        let call = self.provider.generate(self.persona.as_str(), message);
        let answer = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProviderFailure::Timeout)??,
            None => call.await?,
        };

        if answer.trim().is_empty() {
            return Err(ProviderFailure::EmptyResponse);
        }
        Ok(answer)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

//! Google Gemini provider (`models/{model}:generateContent`).
//!
//! The persona travels as `systemInstruction`; the user message is the
//! single turn in `contents`. With `webSearch` enabled the request also
//! grants the `google_search` tool, so answers may be grounded in live
//! search results. Callers cannot tell the difference.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use digiai_core::config::GeminiConfig;
use digiai_core::ConfigError;

use crate::error::ProviderFailure;
use crate::http;
use crate::registry::{non_blank, require, require_url, GEMINI};
use crate::traits::{LlmProvider, LlmRequestConfig};

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    generation_config: GenerationConfigBody,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfigBody {
    temperature: f64,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Result<String, ProviderFailure> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderFailure::Blocked(reason));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(ProviderFailure::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }
        match candidate.finish_reason.as_deref() {
            Some(reason @ ("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "RECITATION")) => {
                Err(ProviderFailure::Blocked(reason.to_string()))
            }
            _ => Err(ProviderFailure::EmptyResponse),
        }
    }
}

// ─────────────────────────────────────────────
// GeminiProvider
// ─────────────────────────────────────────────

/// A provider backed by the Gemini REST API.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    web_search: bool,
    params: LlmRequestConfig,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("web_search", &self.web_search)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(
        config: &GeminiConfig,
        params: LlmRequestConfig,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        require(&config.api_key, &GEMINI, "apiKey", "GEMINI_API_KEY")?;
        require(&config.model, &GEMINI, "model", "DIGIAI_PROVIDERS__GEMINI__MODEL")?;

        let api_base = non_blank(config.api_base.as_deref())
            .or(GEMINI.default_api_base)
            .unwrap_or("https://generativelanguage.googleapis.com/v1beta")
            .trim_end_matches('/')
            .to_string();

        let provider = GeminiProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            model: config.model.trim().trim_start_matches("models/").to_string(),
            web_search: config.web_search,
            params,
        };
        require_url(&provider.endpoint(), &GEMINI, "apiBase")?;

        Ok(provider)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request<'a>(
        &self,
        persona: &'a str,
        user_message: &'a str,
    ) -> GenerateContentRequest<'a> {
        let tools = if self.web_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: persona }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: user_message }],
            }],
            tools,
            generation_config: GenerationConfigBody {
                temperature: self.params.temperature,
                max_output_tokens: self.params.max_tokens,
                top_p: self.params.top_p,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(
        &self,
        persona: &str,
        user_message: &str,
    ) -> Result<String, ProviderFailure> {
        debug!(
            provider = GEMINI.display_name,
            model = %self.model,
            web_search = self.web_search,
            "Calling LLM"
        );

        let request = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(persona, user_message));

        let response: GenerateContentResponse =
            http::execute(request, GEMINI.display_name).await?;
        let text = response.into_text()?;

        debug!(provider = GEMINI.display_name, chars = text.len(), "LLM response received");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        GEMINI.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

//! Chat-completions provider for Azure OpenAI and any OpenAI-compatible API.
//!
//! Both flavors send the same body (`[system(persona), user(message)]`) and
//! read `choices[0].message.content`; they differ only in URL layout and
//! authentication header.

use async_trait::async_trait;
use tracing::debug;

use digiai_core::config::{AzureConfig, OpenAiConfig};
use digiai_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message};
use digiai_core::ConfigError;

use crate::error::ProviderFailure;
use crate::http;
use crate::registry::{non_blank, require, require_url, ProviderSpec, AZURE, OPENAI};
use crate::traits::{LlmProvider, LlmRequestConfig};

/// How the API key is presented.
#[derive(Clone)]
enum Auth {
    /// Azure: `api-key: <key>`.
    ApiKeyHeader(String),
    /// OpenAI-compatible: `Authorization: Bearer <key>`.
    Bearer(String),
}

// ─────────────────────────────────────────────
// ChatCompletionsProvider
// ─────────────────────────────────────────────

/// A provider that talks to a `/chat/completions` endpoint.
pub struct ChatCompletionsProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Full completions URL, without query string.
    url: String,
    /// Azure `api-version` query parameter.
    api_version: Option<String>,
    auth: Auth,
    /// Model name, or the deployment name on Azure.
    model: String,
    params: LlmRequestConfig,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for ChatCompletionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsProvider")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl ChatCompletionsProvider {
    /// Azure OpenAI deployment.
    ///
    /// URL: `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}`.
    pub fn azure(
        config: &AzureConfig,
        params: LlmRequestConfig,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        require(&config.api_key, &AZURE, "apiKey", "AZURE_OPENAI_API_KEY")?;
        require(&config.endpoint, &AZURE, "endpoint", "AZURE_OPENAI_ENDPOINT")?;
        require(&config.deployment, &AZURE, "deployment", "AZURE_OPENAI_DEPLOYMENT_NAME")?;
        require(&config.api_version, &AZURE, "apiVersion", "AZURE_OPENAI_API_VERSION")?;

        let url = format!(
            "{}/openai/deployments/{}/chat/completions",
            config.endpoint.trim().trim_end_matches('/'),
            config.deployment.trim()
        );
        require_url(&url, &AZURE, "endpoint")?;

        Ok(ChatCompletionsProvider {
            client,
            url,
            api_version: Some(config.api_version.clone()),
            auth: Auth::ApiKeyHeader(config.api_key.clone()),
            model: config.deployment.trim().to_string(),
            params,
            spec: &AZURE,
        })
    }

    /// OpenAI or any OpenAI-compatible server.
    ///
    /// URL: `{api_base}/chat/completions`, base defaulting to the public OpenAI API.
    pub fn openai(
        config: &OpenAiConfig,
        params: LlmRequestConfig,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        require(&config.api_key, &OPENAI, "apiKey", "OPENAI_API_KEY")?;
        require(&config.model, &OPENAI, "model", "DIGIAI_PROVIDERS__OPENAI__MODEL")?;

        // Resolve API base: config > spec default
        let api_base = non_blank(config.api_base.as_deref())
            .or(OPENAI.default_api_base)
            .unwrap_or("https://api.openai.com/v1");
        let url = format!("{}/chat/completions", api_base.trim_end_matches('/'));
        require_url(&url, &OPENAI, "apiBase")?;

        Ok(ChatCompletionsProvider {
            client,
            url,
            api_version: None,
            auth: Auth::Bearer(config.api_key.clone()),
            model: config.model.clone(),
            params,
            spec: &OPENAI,
        })
    }

    fn build_request(&self, persona: &str, user_message: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::system(persona), Message::user(user_message)],
            max_tokens: Some(self.params.max_tokens),
            temperature: Some(self.params.temperature),
            top_p: self.params.top_p,
        }
    }
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    async fn generate(
        &self,
        persona: &str,
        user_message: &str,
    ) -> Result<String, ProviderFailure> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            "Calling LLM"
        );

        let body = self.build_request(persona, user_message);
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(ref version) = self.api_version {
            request = request.query(&[("api-version", version)]);
        }
        request = match self.auth {
            Auth::ApiKeyHeader(ref key) => request.header("api-key", key),
            Auth::Bearer(ref key) => request.bearer_auth(key),
        };

        let response: ChatCompletionResponse =
            http::execute(request, self.spec.display_name).await?;

        match response.first_text() {
            Some(text) => {
                debug!(
                    provider = self.spec.display_name,
                    finish_reason = response.finish_reason().unwrap_or("?"),
                    total_tokens = response.usage.as_ref().map_or(0, |u| u.total_tokens),
                    "LLM response received"
                );
                Ok(text.to_string())
            }
            None if response.finish_reason() == Some("content_filter") => {
                Err(ProviderFailure::Blocked("content_filter".to_string()))
            }
            None => Err(ProviderFailure::EmptyResponse),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PERSONA: &str = "You are DigiAI.";

    fn azure_config(endpoint: &str) -> AzureConfig {
        AzureConfig {
            api_key: "azure-key-123".to_string(),
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    fn openai_config(api_base: Option<&str>) -> OpenAiConfig {
        OpenAiConfig {
            api_key: "sk-test".to_string(),
            api_base: api_base.map(String::from),
            ..Default::default()
        }
    }

    fn azure(endpoint: &str) -> ChatCompletionsProvider {
        ChatCompletionsProvider::azure(
            &azure_config(endpoint),
            LlmRequestConfig::default(),
            reqwest::Client::new(),
        )
        .unwrap()
    }

    fn completion(content: serde_json::Value, finish_reason: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [{
                "message": { "content": content },
                "finish_reason": finish_reason
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        }))
    }

    // ── Construction ──

    #[test]
    fn test_azure_url_trailing_slash() {
        let provider = azure("https://res.openai.azure.com/");
        assert_eq!(
            provider.url,
            "https://res.openai.azure.com/openai/deployments/digipurse-ai/chat/completions"
        );
        assert_eq!(provider.api_version.as_deref(), Some("2024-02-01"));
        assert_eq!(provider.model(), "digipurse-ai");
        assert_eq!(provider.display_name(), "Azure OpenAI");
    }

    #[test]
    fn test_azure_missing_endpoint() {
        let config = AzureConfig {
            api_key: "key".into(),
            ..Default::default()
        };
        let err = ChatCompletionsProvider::azure(
            &config,
            LlmRequestConfig::default(),
            reqwest::Client::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "endpoint", .. }));
    }

    #[test]
    fn test_azure_blank_key_rejected() {
        let config = AzureConfig {
            api_key: "   ".into(),
            endpoint: "https://res.openai.azure.com".into(),
            ..Default::default()
        };
        let err = ChatCompletionsProvider::azure(
            &config,
            LlmRequestConfig::default(),
            reqwest::Client::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "apiKey", .. }));
    }

    #[test]
    fn test_azure_endpoint_without_scheme_rejected() {
        let config = AzureConfig {
            api_key: "key".into(),
            endpoint: "res.openai.azure.com".into(),
            ..Default::default()
        };
        let err = ChatCompletionsProvider::azure(
            &config,
            LlmRequestConfig::default(),
            reqwest::Client::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "endpoint", .. }));
    }

    #[test]
    fn test_openai_blank_api_base_falls_back() {
        let provider = ChatCompletionsProvider::openai(
            &openai_config(Some("  ")),
            LlmRequestConfig::default(),
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(provider.url, "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_openai_default_api_base() {
        let provider = ChatCompletionsProvider::openai(
            &openai_config(None),
            LlmRequestConfig::default(),
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(provider.url, "https://api.openai.com/v1/chat/completions");
        assert!(provider.api_version.is_none());
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_body_places_persona_first() {
        let provider = azure("https://res.openai.azure.com");
        let body = provider.build_request(PERSONA, "Hello");
        assert_eq!(
            body.messages,
            vec![Message::system(PERSONA), Message::user("Hello")]
        );
        assert_eq!(body.max_tokens, Some(256));
        assert_eq!(body.top_p, Some(0.95));
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_azure_generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/digipurse-ai/chat/completions"))
            .and(query_param("api-version", "2024-02-01"))
            .and(header("api-key", "azure-key-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "digipurse-ai",
                "messages": [
                    { "role": "system", "content": PERSONA },
                    { "role": "user", "content": "How do I recover my DID?" }
                ],
                "max_tokens": 256
            })))
            .respond_with(completion("Use your recovery phrase.".into(), "stop"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = azure(&mock_server.uri());
        let answer = provider
            .generate(PERSONA, "How do I recover my DID?")
            .await
            .unwrap();

        assert_eq!(answer, "Use your recovery phrase.");
    }

    #[tokio::test]
    async fn test_openai_generate_uses_bearer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(completion("ok".into(), "stop"))
            .mount(&mock_server)
            .await;

        let provider = ChatCompletionsProvider::openai(
            &openai_config(Some(&mock_server.uri())),
            LlmRequestConfig::default(),
            reqwest::Client::new(),
        )
        .unwrap();

        assert_eq!(provider.generate(PERSONA, "hi").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&mock_server)
            .await;

        let err = azure(&mock_server.uri())
            .generate(PERSONA, "hi")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderFailure::Unauthorized {
                status: 401,
                body: "invalid api key".into()
            }
        );
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded" }
            })))
            .mount(&mock_server)
            .await;

        let err = azure(&mock_server.uri())
            .generate(PERSONA, "hi")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "rate_limited");
        assert!(err.to_string().contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&mock_server)
            .await;

        let err = azure(&mock_server.uri())
            .generate(PERSONA, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderFailure::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(completion(serde_json::Value::Null, "stop"))
            .mount(&mock_server)
            .await;

        let err = azure(&mock_server.uri())
            .generate(PERSONA, "hi")
            .await
            .unwrap_err();
        assert_eq!(err, ProviderFailure::EmptyResponse);
    }

    #[tokio::test]
    async fn test_content_filter_is_blocked() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(completion(serde_json::Value::Null, "content_filter"))
            .mount(&mock_server)
            .await;

        let err = azure(&mock_server.uri())
            .generate(PERSONA, "hi")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "blocked");
    }

    #[tokio::test]
    async fn test_network_error() {
        // Point to a port that's not listening
        let err = azure("http://127.0.0.1:1")
            .generate(PERSONA, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderFailure::Network(_)));
    }

    #[tokio::test]
    async fn test_client_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(completion("late".into(), "stop").set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let provider = ChatCompletionsProvider::azure(
            &azure_config(&mock_server.uri()),
            LlmRequestConfig::default(),
            client,
        )
        .unwrap();

        let err = provider.generate(PERSONA, "hi").await.unwrap_err();
        assert_eq!(err, ProviderFailure::Timeout);
    }
}

//! Shared HTTP plumbing for the adapters: client construction and
//! request execution with failure mapping.

use std::time::Duration;

use digiai_core::ConfigError;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ProviderFailure;

/// Build the process-wide HTTP client. A zero timeout disables the limit.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, ConfigError> {
    let mut builder = reqwest::Client::builder();
    if timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }
    builder
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// Send a request and decode a JSON success body.
///
/// Transport errors, non-2xx statuses, and undecodable bodies all come back
/// as a [`ProviderFailure`].
pub(crate) async fn execute<T: DeserializeOwned>(
    request: RequestBuilder,
    provider: &str,
) -> Result<T, ProviderFailure> {
    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            let failure = ProviderFailure::from(e);
            warn!(provider, kind = failure.kind(), error = %failure, "HTTP request failed");
            return Err(failure);
        }
    };

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        let failure = ProviderFailure::from_status(status, &error_text);
        warn!(provider, status = %status, kind = failure.kind(), error = %failure, "API error");
        return Err(failure);
    }

    let bytes = response.bytes().await.map_err(ProviderFailure::from)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(provider, error = %e, "Failed to parse LLM response");
        ProviderFailure::MalformedResponse(e.to_string())
    })
}

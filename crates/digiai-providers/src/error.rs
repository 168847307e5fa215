//! Provider failures: everything that can go wrong between us and a backend.
//!
//! Adapters never let a backend error escape untranslated; the relay handler
//! logs these and masks them behind a fixed answer.

use digiai_core::utils::truncate_string;
use reqwest::StatusCode;

/// Maximum characters of an error body kept for diagnostics.
const MAX_BODY_CHARS: usize = 500;

/// A failed generation call.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ProviderFailure {
    /// Connection refused, DNS failure, TLS error, reset, …
    #[error("network error: {0}")]
    Network(String),

    /// The backend did not answer within the request budget.
    #[error("request timed out")]
    Timeout,

    /// 401 / 403: bad or expired credentials.
    #[error("authentication rejected ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// 429: quota or rate limit.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The backend refused to answer (safety filter, blocked prompt).
    #[error("response blocked: {0}")]
    Blocked(String),

    /// Success status but no usable text.
    #[error("response contained no text")]
    EmptyResponse,
}

impl ProviderFailure {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderFailure::Network(_) => "network",
            ProviderFailure::Timeout => "timeout",
            ProviderFailure::Unauthorized { .. } => "unauthorized",
            ProviderFailure::RateLimited(_) => "rate_limited",
            ProviderFailure::Api { .. } => "api",
            ProviderFailure::MalformedResponse(_) => "malformed_response",
            ProviderFailure::Blocked(_) => "blocked",
            ProviderFailure::EmptyResponse => "empty_response",
        }
    }

    /// Map a non-success HTTP status and its body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = truncate_string(body.trim(), MAX_BODY_CHARS);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderFailure::Unauthorized {
                status: status.as_u16(),
                body,
            },
            StatusCode::TOO_MANY_REQUESTS => ProviderFailure::RateLimited(body),
            _ => ProviderFailure::Api {
                status: status.as_u16(),
                body,
            },
        }
    }
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderFailure::Timeout
        } else if e.is_decode() {
            ProviderFailure::MalformedResponse(e.to_string())
        } else {
            ProviderFailure::Network(e.to_string())
        }
    }
}

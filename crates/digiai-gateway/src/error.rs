//! Client-facing error envelope.
//!
//! Only bad input reaches the client as an error. Provider failures are
//! masked by the relay and never show up here.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use digiai_relay::InputError;

/// Error returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    /// Missing, blank, or malformed payload.
    BadRequest(InputError),
    /// The body could not be read, e.g. it exceeds the size limit.
    Body(BytesRejection),
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::BadRequest(e)
    }
}

impl From<BytesRejection> for ApiError {
    fn from(e: BytesRejection) -> Self {
        ApiError::Body(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Body(rejection) => {
                let status = rejection.status();
                warn!(status = %status, error = %rejection.body_text(), "unreadable request body");
                let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "Request body too large".to_string()
                } else {
                    rejection.body_text()
                };
                (status, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

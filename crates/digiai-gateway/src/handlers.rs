//! Route handlers.
//!
//! Bodies are taken as raw bytes so that every rejection, including
//! unparseable JSON and a wrong content type, gets the same 400 envelope.
//! Oversized bodies get a 413 in the same envelope.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use digiai_core::ChatResponse;
use digiai_relay::RequestField;

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /chat` with `{"message": "..."}`.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    relay(&state, &body?, RequestField::Message).await
}

/// `POST /query` with `{"question": "..."}`.
pub async fn query(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    relay(&state, &body?, RequestField::Question).await
}

async fn relay(
    state: &AppState,
    body: &[u8],
    field: RequestField,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state.relay.handle_payload(body, field).await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
}

/// `GET /health`. Does not call the provider.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.relay.provider();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider: provider.display_name().to_string(),
        model: provider.model().to_string(),
    })
}

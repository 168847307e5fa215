//! DigiAI Relay: the per-request path from a raw payload to an answer.
//!
//! - **request**: payload parsing and [`InputError`]
//! - **handler**: [`RelayHandler`], which calls the provider and masks its failures

pub mod handler;
pub mod request;

pub use handler::{RelayHandler, FALLBACK_ANSWER};
pub use request::{parse_request, request_from_text, InputError, InputErrorReason, RequestField};

//! DigiAI Gateway: the HTTP surface of the relay.
//!
//! - **router**: routes and middleware (CORS, request tracing, body limit)
//! - **handlers**: `/chat`, `/query`, `/health`
//! - **error**: client errors as JSON envelopes
//! - **server**: bind and serve until Ctrl+C

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::{build_router, MAX_BODY_BYTES};
pub use server::{serve, serve_on};
pub use state::AppState;

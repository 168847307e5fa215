//! Shared application state.

use std::sync::Arc;

use digiai_relay::RelayHandler;

/// State handed to every handler. Cloning copies one `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    pub relay: Arc<RelayHandler>,
}

impl AppState {
    pub fn new(relay: RelayHandler) -> Self {
        AppState {
            relay: Arc::new(relay),
        }
    }
}

//! Bind and serve.

use std::io;

use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{info, warn};

use crate::router::build_router;
use crate::state::AppState;

/// Serve the relay on `addr` until Ctrl+C.
pub async fn serve<A: ToSocketAddrs>(addr: A, state: AppState) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

/// Serve on an already-bound listener.
pub async fn serve_on(listener: TcpListener, state: AppState) -> io::Result<()> {
    let local = listener.local_addr()?;
    info!(
        addr = %local,
        provider = state.relay.provider().display_name(),
        model = state.relay.provider().model(),
        "DigiAI relay listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

//! Server-Sent Events transport.
//!
//! HTTP server carrying the event stream. Routing and per-connection
//! session wiring live in [`crate::server`]; this module only binds
//! the listener and runs it.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::error::{BridgeError, Result};
use crate::protocol::{Dispatcher, ServerCapabilities};
use crate::server::{create_router, AppState, ServerConfig};

/// Bind the configured address and serve SSE connections until the
/// process is stopped.
pub async fn serve(
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
    capabilities: ServerCapabilities,
) -> Result<()> {
    let addr = config.addr;
    let state = Arc::new(AppState::new(config, dispatcher).with_capabilities(capabilities));
    let router = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| BridgeError::Server(format!("Failed to bind SSE to {}: {}", addr, e)))?;

    info!("SSE transport listening on http://{}", addr);
    info!("Event stream at GET /sse, request endpoint at POST /messages/:id");

    axum::serve(listener, router)
        .await
        .map_err(|e| BridgeError::Server(format!("SSE server error: {}", e)))?;

    Ok(())
}

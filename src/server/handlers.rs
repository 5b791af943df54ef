//! HTTP request handlers for the SSE transport.
//!
//! A client opens `GET /sse` to receive a stream of events; the first
//! event names the per-connection endpoint it must POST request frames
//! to, and every later `message` event carries one response frame. Each
//! connection gets its own [`Session`] driven by a worker task, so a
//! slow WordPress call on one connection never stalls another.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::state::AppState;
use crate::protocol::{ConnectionHandle, ConnectionId, ServerCapabilities, Session};
use crate::transport::process_line;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Health and status
        .route("/health", get(health_check))
        .route("/status", get(status))
        // SSE event stream and its request back-channel
        .route("/sse", get(sse_connect))
        .route("/messages/:id", post(post_message));

    if state.config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    if state.config.logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Service version
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: crate::SERVER_NAME,
        version: crate::VERSION,
    })
}

/// Status response
#[derive(Serialize)]
pub struct StatusResponse {
    /// Service status
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
    /// Seconds since the server started
    pub uptime_secs: u64,
    /// Currently tracked SSE connections
    pub active_connections: usize,
    /// Capabilities advertised to clients
    pub capabilities: ServerCapabilities,
}

/// Status endpoint
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok",
        version: crate::VERSION,
        uptime_secs: state.uptime().as_secs(),
        active_connections: state.connections.count().await,
        capabilities: state.capabilities,
    })
}

/// Open an SSE stream and start its session worker.
async fn sse_connect(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

    let id = state
        .connections
        .track(ConnectionHandle {
            inbound: inbound_tx,
            outbound: outbound_tx.clone(),
        })
        .await;

    let session = Session::new(state.capabilities);
    info!(connection = %id, session = %session.id(), "SSE client connected");

    tokio::spawn(session_worker(
        state.clone(),
        id,
        session,
        inbound_rx,
        outbound_tx,
    ));

    let keep_alive = KeepAlive::new().interval(state.config.keep_alive);
    let endpoint = stream::once(async move {
        Ok(Event::default()
            .event("endpoint")
            .data(format!("/messages/{id}")))
    });
    let messages = stream::unfold(outbound_rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|frame| (Ok(Event::default().event("message").data(frame)), rx))
    });

    Sse::new(endpoint.chain(messages)).keep_alive(keep_alive)
}

/// Receive one frame from the client and hand it to the connection's
/// worker. Replies arrive on the SSE stream, not in this response.
async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    body: String,
) -> impl IntoResponse {
    let id = ConnectionId(id);
    let Some(handle) = state.connections.get(id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Unknown connection"})),
        );
    };

    if handle.inbound.send(body).is_err() {
        state.connections.untrack(id).await;
        return (
            StatusCode::GONE,
            Json(serde_json::json!({"error": "Connection closed"})),
        );
    }

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({"status": "accepted"})),
    )
}

/// Per-connection worker: owns the session, drains inbound frames and
/// pushes response frames to the SSE stream.
async fn session_worker(
    state: Arc<AppState>,
    id: ConnectionId,
    mut session: Session,
    mut inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
) {
    while let Some(line) = inbound.recv().await {
        let (reply, close) = process_line(&mut session, &state.dispatcher, &line).await;
        if let Some(frame) = reply {
            if outbound.send(frame).is_err() {
                debug!(connection = %id, "SSE stream gone, stopping worker");
                break;
            }
        }
        if close {
            debug!(connection = %id, "session shut down, closing connection");
            break;
        }
    }
    state.connections.untrack(id).await;
}

//! HTTP server for the SSE transport.
//!
//! Serves the event stream, its request back-channel and a pair of
//! monitoring endpoints:
//! - `GET /sse` opens the event stream and starts a session
//! - `POST /messages/:id` feeds request frames to that session
//! - `GET /health` and `GET /status` report liveness and load
//!
//! # Example
//!
//! ```rust,ignore
//! use wp_bridge::server::{create_router, AppState, ServerConfig};
//!
//! let config = ServerConfig::default().with_port(8080);
//! let state = Arc::new(AppState::new(config, dispatcher));
//! let router = create_router(state);
//! ```

mod config;
mod handlers;
mod state;

pub use config::ServerConfig;
pub use handlers::{create_router, health_check};
pub use state::AppState;

//! Shared server state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::protocol::{ConnectionRegistry, Dispatcher, ServerCapabilities};

use super::config::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Method dispatcher, shared by every connection
    pub dispatcher: Arc<Dispatcher>,
    /// Live SSE connections
    pub connections: ConnectionRegistry,
    /// Capability set advertised to initializing clients
    pub capabilities: ServerCapabilities,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ServerConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            connections: ConnectionRegistry::new(),
            capabilities: ServerCapabilities::default(),
            start_time: Instant::now(),
        }
    }

    /// Override the advertised capability set
    pub fn with_capabilities(mut self, capabilities: ServerCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Get server uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

//! HTTP server configuration for the SSE transport.

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub addr: SocketAddr,
    /// SSE keep-alive comment interval
    pub keep_alive: Duration,
    /// Enable request logging
    pub logging: bool,
    /// CORS enabled
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            keep_alive: Duration::from_secs(15),
            logging: true,
            cors_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Create with custom port
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr = SocketAddr::from(([127, 0, 0, 1], port));
        self
    }

    /// Bind to all interfaces
    pub fn bind_all(mut self) -> Self {
        let port = self.addr.port();
        self.addr = SocketAddr::from(([0, 0, 0, 0], port));
        self
    }

    /// Set address directly
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Set the SSE keep-alive interval
    pub fn with_keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }

    /// Disable logging
    pub fn without_logging(mut self) -> Self {
        self.logging = false;
        self
    }

    /// Disable CORS
    pub fn without_cors(mut self) -> Self {
        self.cors_enabled = false;
        self
    }
}

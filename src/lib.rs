//! # WP Bridge - WordPress Control Over JSON-RPC
//!
//! Tool server exposing WordPress and WooCommerce REST APIs as a typed
//! JSON-RPC 2.0 tool catalog, with per-site capability filtering,
//! consent and rate-limit gating, and a full audit trail.
//!
//! ## Features
//!
//! - **Tool catalog**: 28 tools covering posts, pages, reusable blocks,
//!   media, themes and WooCommerce shop data
//! - **Protocol sessions**: `initialize`/`shutdown` lifecycle with
//!   capability negotiation per connection
//! - **Multi-site**: one registry serves any number of WordPress sites,
//!   each with its own credentials and tool permissions
//! - **Security gate**: consent checks, per-tool rate limiting and
//!   credential-masked audit events around every tool call
//! - **Dual transports**: newline-delimited stdio and HTTP Server-Sent
//!   Events carrying identical traffic
//!
//! ## Protocol Overview
//!
//! Clients speak JSON-RPC 2.0, one request per frame. The session layer
//! answers lifecycle methods itself and defers everything else to the
//! dispatcher, which resolves the tool, applies the security gate and
//! calls the target site's REST API.
//!
//! ### Architecture
//!
//! ```text
//! Client                      WP Bridge                      WordPress
//!    |                            |                              |
//!    |----- initialize --------->| Session                       |
//!    |<---- capabilities --------|                               |
//!    |                            |                              |
//!    |----- callTool ----------->| Dispatcher -> SecurityGate    |
//!    |                            |     -> WpClient ------------>|
//!    |<---- content -------------|<-----------------------------|
//!    |                            |                              |
//!    |----- shutdown ----------->|                               |
//!    |<---- success -------------|                               |
//! ```
//!
//! ### Session States
//!
//! ```text
//!                  initialize
//!  [Uninitialized] ──────────> [Initialized]
//!         │                         │
//!         │                         │ shutdown
//!         v                         v
//!    (tool calls                [ShutDown]
//!     allowed in               (terminal, no
//!     every state)              re-initialize)
//! ```
//!
//! ### Methods
//!
//! | Method                  | Handled by | Purpose                          |
//! |-------------------------|------------|----------------------------------|
//! | `initialize`            | Session    | Negotiate capabilities           |
//! | `shutdown`              | Session    | End the session                  |
//! | `listTools`             | Dispatcher | Advertise the tool catalog       |
//! | `callTool`              | Dispatcher | Execute one tool against a site  |
//! | `listResources`         | Dispatcher | List configured sites            |
//! | `readResource`          | Dispatcher | Describe one site                |
//! | `listResourceTemplates` | Dispatcher | Per-site tool call templates     |
//! | `listPrompts`           | Dispatcher | Advertise prompt workflows       |
//! | `getPrompt`             | Dispatcher | Render one prompt                |
//!
//! ## Quick Start
//!
//! ### Serve over stdio
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wp_bridge::config::load_sites_from_env;
//! use wp_bridge::protocol::{Dispatcher, ServerCapabilities};
//! use wp_bridge::security::{SecurityGate, TracingSink};
//! use wp_bridge::wp::SiteRegistry;
//!
//! let registry = SiteRegistry::new(load_sites_from_env()?)?;
//! let security = SecurityGate::new(Arc::new(TracingSink));
//! let dispatcher = Arc::new(Dispatcher::new(registry, security));
//!
//! wp_bridge::transport::stdio::run(dispatcher, ServerCapabilities::default()).await?;
//! ```
//!
//! ### Dispatch a call directly
//!
//! ```rust,ignore
//! use wp_bridge::protocol::{PendingCall, RequestId};
//!
//! let call = PendingCall {
//!     id: RequestId::Number(1),
//!     method: "listTools".to_string(),
//!     params: None,
//! };
//! let response = dispatcher.dispatch("session-1", call).await;
//! ```
//!
//! ## Modules
//!
//! - [`protocol`]: message codec, sessions, capability negotiation and
//!   the method dispatcher
//! - [`tools`]: tool catalog, typed arguments, resources and prompts
//! - [`wp`]: WordPress and WooCommerce REST clients
//! - [`security`]: consent, rate limiting and audit events
//! - [`server`]: HTTP server backing the SSE transport
//! - [`transport`]: stdio and SSE front ends
//! - [`config`]: site inventory and bridge settings
//! - [`error`]: error types and result alias
//!
//! ## Tool Catalog
//!
//! | Category  | Tools | Examples                                      |
//! |-----------|-------|-----------------------------------------------|
//! | discovery | 1     | `claudeus_wp_discover_endpoints`              |
//! | posts     | 4     | `claudeus_wp_content__get_posts`              |
//! | pages     | 4     | `claudeus_wp_content__create_page`            |
//! | blocks    | 5     | `claudeus_wp_content__get_block_revisions`    |
//! | media     | 4     | `claudeus_wp_media__upload`                   |
//! | themes    | 7     | `claudeus_wp_theme__activate`                 |
//! | shop      | 3     | `claudeus_wp_shop__get_sales`                 |

pub mod config;
pub mod error;
pub mod protocol;
pub mod security;
pub mod server;
pub mod tools;
pub mod transport;
pub mod wp;

// Re-exports for convenience
pub use config::{BridgeConfig, SiteConfig};
pub use error::{BridgeError, Result};
pub use protocol::{
    Dispatcher, Response, ServerCapabilities, Session, SessionState, PROTOCOL_VERSION,
};
pub use security::SecurityGate;
pub use server::{AppState, ServerConfig};
pub use tools::{ToolCategory, ToolId};
pub use transport::TransportKind;
pub use wp::{SiteRegistry, WpClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name the server advertises during initialization
pub const SERVER_NAME: &str = "claudeus-wp-mcp";

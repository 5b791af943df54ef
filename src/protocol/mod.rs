//! JSON-RPC 2.0 session protocol for the WordPress bridge.
//!
//! Implements the framed request/response protocol clients speak to the
//! bridge: strict message decoding, an initialize/shutdown session
//! lifecycle with capability negotiation, and dispatch of every other
//! method to the tool surface.
//!
//! # Protocol Overview
//!
//! Each connection owns one [`Session`]. Messages are single-line JSON
//! frames; requests carry an id and are always answered, notifications
//! never are.
//!
//! ## Message Flow
//!
//! ```text
//! Client                              Server
//!    |                                  |
//!    |------ initialize (caps) ------->|  Capability negotiation
//!    |<----- InitializeResult ---------|  Session initialized
//!    |                                  |
//!    |====== listTools / callTool =====>|  Tool traffic
//!    |<====== result or error =========|
//!    |                                  |
//!    |------ shutdown --------------->|  Terminate session
//!    |<----- { success: true } -------|
//! ```
//!
//! ## State Machine
//!
//! | State           | Description                      | Valid Transitions |
//! |-----------------|----------------------------------|-------------------|
//! | `Uninitialized` | New session, no handshake yet    | → Initialized     |
//! | `Initialized`   | Ready for tool traffic           | → ShutDown        |
//! | `ShutDown`      | Session terminated               | (terminal)        |
//!
//! Tool methods are dispatched in every state; only `initialize` and
//! `shutdown` are state-checked. A session that has shut down can never
//! be initialized again.
//!
//! ## Error Codes
//!
//! | Code     | Meaning                                   |
//! |----------|-------------------------------------------|
//! | `-32700` | Unparseable frame                         |
//! | `-32600` | Structurally invalid request              |
//! | `-32601` | Unknown method, or unknown tool           |
//! | `-32602` | Invalid or missing parameters             |
//! | `-32603` | Internal fault in the bridge itself       |
//! | `-32000` | Refused by a site, filter or consent gate |
//!
//! # Usage
//!
//! ```rust,ignore
//! use wp_bridge::protocol::{Session, SessionOutput, ServerCapabilities};
//!
//! let mut session = Session::new(ServerCapabilities::default());
//!
//! match session.process_raw(line) {
//!     SessionOutput::Reply(response) => send(response.to_json()?),
//!     SessionOutput::Dispatch(call) => {
//!         let response = dispatcher.dispatch(session.id(), call).await;
//!         send(response.to_json()?)
//!     }
//!     _ => {}
//! }
//! ```

mod capabilities;
mod dispatcher;
mod message;
mod registry;
mod session;

pub use capabilities::{
    is_tool_allowed, CapabilityFlags, InitializeResult, ServerCapabilities, ServerInfo,
};
pub use dispatcher::Dispatcher;
pub use message::{
    decode, error_codes, DecodeOutcome, Frame, InvalidFrame, Notification, Request, RequestId,
    Response, RpcError, JSONRPC_VERSION,
};
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
pub use session::{PendingCall, Session, SessionOutput, SessionState, SessionStats};

/// Protocol revision advertised in the initialize result.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Maximum session idle time (5 minutes).
pub const SESSION_TIMEOUT_SECS: u64 = 300;

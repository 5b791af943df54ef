//! Transport layer for the protocol bridge.
//!
//! Two transports carry the same JSON-RPC traffic:
//! - [`stdio`]: newline-delimited frames on stdin/stdout, one session
//!   for the life of the process
//! - [`sse`]: an HTTP server that streams response frames over
//!   Server-Sent Events, one session per connection
//!
//! Frame handling is shared. [`process_line`] feeds one raw line
//! through a session; when the session defers the call, it runs the
//! dispatcher and records the response against the session.
//!
//! ```rust,ignore
//! use wp_bridge::transport::TransportKind;
//!
//! match kind {
//!     TransportKind::Stdio => transport::stdio::run(dispatcher, capabilities).await?,
//!     TransportKind::Sse => transport::sse::serve(config, dispatcher, capabilities).await?,
//! }
//! ```

pub mod sse;
pub mod stdio;

use std::fmt;
use std::str::FromStr;

use tracing::error;

use crate::protocol::{Dispatcher, Response, Session, SessionOutput};

/// Which transport the server speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    /// Newline-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// Server-Sent Events over HTTP
    Sse,
}

impl TransportKind {
    /// Transport name as used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "sse" => Ok(Self::Sse),
            _ => Err(format!("Unknown transport kind: {s}")),
        }
    }
}

/// Run one raw line through a session.
///
/// Returns the frame to send back (if any) and whether the connection
/// must close afterwards.
pub(crate) async fn process_line(
    session: &mut Session,
    dispatcher: &Dispatcher,
    line: &str,
) -> (Option<String>, bool) {
    match session.process_raw(line) {
        SessionOutput::Reply(response) => (encode(&response), false),
        SessionOutput::ReplyAndClose(response) => (encode(&response), true),
        SessionOutput::Dispatch(call) => {
            let scope = session.id().to_string();
            let response = dispatcher.dispatch(&scope, call).await;
            session.note_response();
            (encode(&response), false)
        }
        SessionOutput::Notified(_) | SessionOutput::Ignored => (None, false),
    }
}

fn encode(response: &Response) -> Option<String> {
    match response.to_json() {
        Ok(frame) => Some(frame),
        Err(e) => {
            error!(error = %e, "failed to encode response frame");
            None
        }
    }
}

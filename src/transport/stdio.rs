//! Newline-delimited JSON-RPC over stdin/stdout.
//!
//! One frame per line, one session for the life of the process. The
//! loop ends on stdin EOF or after the reply to `shutdown` is flushed.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::process_line;
use crate::error::Result;
use crate::protocol::{Dispatcher, ServerCapabilities, Session};

/// Serve a single session over stdin/stdout.
pub async fn run(dispatcher: Arc<Dispatcher>, capabilities: ServerCapabilities) -> Result<()> {
    let mut session = Session::new(capabilities);
    info!(session = %session.id(), "stdio transport ready");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let (reply, close) = process_line(&mut session, &dispatcher, &line).await;
        if let Some(frame) = reply {
            stdout.write_all(frame.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        if close {
            debug!(session = %session.id(), "session shut down, leaving stdio loop");
            break;
        }
    }

    let stats = session.stats();
    info!(
        session = %stats.session_id,
        requests = stats.requests_received,
        responses = stats.responses_sent,
        "stdio transport closed"
    );
    Ok(())
}

//! Per-connection session lifecycle.
//!
//! A session owns the initialization state machine for one logical client
//! connection and classifies every decoded frame into the action the
//! transport must take: reply immediately, reply and close, hand the
//! request to the method dispatcher, or do nothing.
//!
//! The two built-in methods (`initialize`, `shutdown`) are handled here;
//! everything else is delegated without inspecting the session state.
//! Notifications never produce a response, in any state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use super::capabilities::{validate_client_capabilities, InitializeResult, ServerCapabilities};
use super::message::{
    decode, DecodeOutcome, Frame, InvalidFrame, Notification, Request, RequestId, Response,
    RpcError,
};
use super::SESSION_TIMEOUT_SECS;

/// Session initialization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state; no successful initialize yet.
    Uninitialized,
    /// Handshake complete, requests flow normally.
    Initialized,
    /// Terminal for this connection instance; a reconnect starts a
    /// fresh session.
    ShutDown,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "uninitialized"),
            SessionState::Initialized => write!(f, "initialized"),
            SessionState::ShutDown => write!(f, "shut_down"),
        }
    }
}

/// A request the session cannot answer itself, handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct PendingCall {
    /// Request id the eventual response must carry.
    pub id: RequestId,
    /// Method name.
    pub method: String,
    /// Raw params, validated downstream per method.
    pub params: Option<Value>,
}

/// Action the transport must take after feeding one frame in.
#[derive(Debug)]
pub enum SessionOutput {
    /// Send this response.
    Reply(Response),
    /// Send this response, then close the connection.
    ReplyAndClose(Response),
    /// Run the dispatcher for this call and send its response.
    Dispatch(PendingCall),
    /// A notification was observed; nothing to send.
    Notified(Notification),
    /// Frame dropped (garbage, unmatched response, id-less malformed).
    Ignored,
}

/// An in-flight server-initiated request.
#[derive(Debug, Clone)]
struct OutboundRequest {
    method: String,
    sent_at: Instant,
}

/// Protocol session for one client connection.
pub struct Session {
    id: String,
    state: SessionState,
    capabilities: ServerCapabilities,
    client_capabilities: Option<Value>,
    /// Server-initiated requests awaiting a client response.
    outbound: HashMap<RequestId, OutboundRequest>,
    notification_observer: Option<Box<dyn Fn(&Notification) + Send + Sync>>,
    last_activity: Instant,
    timeout: Duration,
    requests_received: u64,
    responses_sent: u64,
    notifications_received: u64,
}

impl Session {
    /// Create a new session advertising the given capability set.
    pub fn new(capabilities: ServerCapabilities) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: SessionState::Uninitialized,
            capabilities,
            client_capabilities: None,
            outbound: HashMap::new(),
            notification_observer: None,
            last_activity: Instant::now(),
            timeout: Duration::from_secs(SESSION_TIMEOUT_SECS),
            requests_received: 0,
            responses_sent: 0,
            notifications_received: 0,
        }
    }

    /// Create a session with an externally assigned id.
    pub fn with_id(id: &str, capabilities: ServerCapabilities) -> Self {
        let mut session = Self::new(capabilities);
        session.id = id.to_string();
        session
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once initialize has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state == SessionState::Initialized
    }

    /// True when the session has been idle past its timeout.
    pub fn is_expired(&self) -> bool {
        self.last_activity.elapsed() > self.timeout
    }

    /// Client capabilities declared at initialize, if any.
    pub fn client_capabilities(&self) -> Option<&Value> {
        self.client_capabilities.as_ref()
    }

    /// Register a callback invoked for every inbound notification.
    pub fn on_notification<F>(&mut self, observer: F)
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.notification_observer = Some(Box::new(observer));
    }

    /// Record a server-initiated request so its eventual response can be
    /// correlated.
    pub fn track_outbound(&mut self, id: RequestId, method: &str) {
        self.outbound.insert(
            id,
            OutboundRequest {
                method: method.to_string(),
                sent_at: Instant::now(),
            },
        );
    }

    /// Number of server-initiated requests still awaiting a response.
    pub fn pending_outbound(&self) -> usize {
        self.outbound.len()
    }

    /// Decode one raw line and feed it through the state machine.
    pub fn process_raw(&mut self, raw: &str) -> SessionOutput {
        match decode(raw) {
            DecodeOutcome::Frame(frame) => self.process_frame(frame),
            DecodeOutcome::Invalid(invalid) => self.process_invalid(invalid),
            DecodeOutcome::Unparseable => {
                tracing::debug!(session = %self.id, "dropping unparseable frame");
                SessionOutput::Ignored
            }
        }
    }

    /// Feed one decoded frame through the state machine.
    pub fn process_frame(&mut self, frame: Frame) -> SessionOutput {
        self.touch();

        match frame {
            Frame::Request(req) => {
                self.requests_received += 1;
                match req.method.as_str() {
                    "initialize" => self.process_initialize(&req),
                    "shutdown" => self.process_shutdown(&req),
                    _ => SessionOutput::Dispatch(PendingCall {
                        id: req.id,
                        method: req.method,
                        params: req.params,
                    }),
                }
            }
            Frame::Notification(n) => {
                self.notifications_received += 1;
                if let Some(observer) = &self.notification_observer {
                    observer(&n);
                }
                SessionOutput::Notified(n)
            }
            Frame::Response(resp) => self.process_response(resp),
        }
    }

    fn process_invalid(&mut self, invalid: InvalidFrame) -> SessionOutput {
        self.touch();
        match invalid {
            InvalidFrame::WithId(id) => {
                self.responses_sent += 1;
                SessionOutput::Reply(Response::error(id, RpcError::invalid_request()))
            }
            InvalidFrame::UnusableId => {
                self.responses_sent += 1;
                SessionOutput::Reply(Response::error_null_id(RpcError::invalid_request()))
            }
            InvalidFrame::NoId => {
                tracing::debug!(session = %self.id, "dropping malformed frame without id");
                SessionOutput::Ignored
            }
        }
    }

    fn process_initialize(&mut self, req: &Request) -> SessionOutput {
        if self.state == SessionState::ShutDown {
            self.responses_sent += 1;
            return SessionOutput::Reply(Response::error(
                req.id.clone(),
                RpcError::internal_error("Server error: Cannot initialize after shutdown"),
            ));
        }

        let client_caps = match validate_client_capabilities(req.params.as_ref()) {
            Ok(caps) => caps,
            Err(err) => {
                self.responses_sent += 1;
                return SessionOutput::Reply(Response::error(req.id.clone(), err));
            }
        };

        let granted = self.capabilities.negotiate(&client_caps);
        self.client_capabilities = Some(client_caps);
        self.state = SessionState::Initialized;
        self.responses_sent += 1;

        tracing::debug!(session = %self.id, "session initialized");

        let result = InitializeResult::new(granted);
        match serde_json::to_value(&result) {
            Ok(value) => SessionOutput::Reply(Response::success(req.id.clone(), value)),
            Err(e) => SessionOutput::Reply(Response::error(
                req.id.clone(),
                RpcError::internal_error(format!("Server error: {}", e)),
            )),
        }
    }

    fn process_shutdown(&mut self, req: &Request) -> SessionOutput {
        if self.state != SessionState::Initialized {
            self.responses_sent += 1;
            return SessionOutput::Reply(Response::error(
                req.id.clone(),
                RpcError::internal_error("Server error: Cannot shutdown before initialization"),
            ));
        }

        self.state = SessionState::ShutDown;
        self.responses_sent += 1;

        tracing::debug!(session = %self.id, "session shut down");

        SessionOutput::ReplyAndClose(Response::success(
            req.id.clone(),
            serde_json::json!({"success": true}),
        ))
    }

    fn process_response(&mut self, resp: Response) -> SessionOutput {
        let Some(id) = resp.id.clone() else {
            return SessionOutput::Ignored;
        };

        match self.outbound.remove(&id) {
            Some(pending) => {
                tracing::debug!(
                    session = %self.id,
                    method = %pending.method,
                    elapsed_ms = pending.sent_at.elapsed().as_millis() as u64,
                    "matched response to outbound request"
                );
                SessionOutput::Ignored
            }
            None => {
                tracing::debug!(session = %self.id, %id, "dropping unmatched response");
                SessionOutput::Ignored
            }
        }
    }

    /// Record that the dispatcher produced a response for this session.
    pub fn note_response(&mut self) {
        self.responses_sent += 1;
        self.touch();
    }

    /// Session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            session_id: self.id.clone(),
            state: self.state,
            requests_received: self.requests_received,
            responses_sent: self.responses_sent,
            notifications_received: self.notifications_received,
            pending_outbound: self.outbound.len(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("pending_outbound", &self.outbound.len())
            .finish_non_exhaustive()
    }
}

/// Session statistics.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Session id.
    pub session_id: String,
    /// Current state.
    pub state: SessionState,
    /// Requests received.
    pub requests_received: u64,
    /// Responses produced by the session itself.
    pub responses_sent: u64,
    /// Notifications received.
    pub notifications_received: u64,
    /// Server-initiated requests awaiting a response.
    pub pending_outbound: usize,
}

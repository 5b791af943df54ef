//! Audit trail for consent decisions and tool executions.
//!
//! Events are pushed through an [`AuditSink`]; the server wires in
//! [`TracingSink`] so entries land in the structured log, while tests
//! use [`MemorySink`] to assert on what was recorded. Details pass
//! through [`mask_sensitive`] on the way in, so credentials never
//! reach a sink in the clear.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::privacy::mask_sensitive;

/// Outcome recorded on an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// Operation completed or was permitted.
    Success,
    /// Operation failed or was refused.
    Failure,
}

impl AuditStatus {
    /// Lowercase wire text.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "success",
            AuditStatus::Failure => "failure",
        }
    }
}

/// One audit trail entry.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Event class, e.g. `consent` or `tool_execution`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Operation within the class, e.g. the consent kind or `execute`.
    pub operation: String,
    /// Outcome.
    pub status: AuditStatus,
    /// Free-form event payload, masked before storage.
    pub details: Value,
}

impl AuditEvent {
    /// New event with empty details.
    pub fn new(kind: &str, operation: &str, status: AuditStatus) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: kind.to_string(),
            operation: operation.to_string(),
            status,
            details: json!({}),
        }
    }

    /// Attach details; sensitive fields are masked here so every sink
    /// sees the same redacted payload.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = mask_sensitive(&details);
        self
    }
}

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: AuditEvent);
}

/// In-memory sink for asserting on recorded events.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemorySink {
    /// New empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemorySink {
    fn record(&self, event: AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Sink that forwards events to the structured log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, event: AuditEvent) {
        info!(
            target: "audit",
            kind = %event.kind,
            operation = %event.operation,
            status = event.status.as_str(),
            details = %event.details,
            "audit event"
        );
    }
}

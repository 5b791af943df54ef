//! Consent, rate limiting and audit for tool execution.
//!
//! Every `callTool` passes through the [`SecurityGate`] before any
//! WordPress request is made, and reports back after the handler
//! finishes. The gate is deliberately permissive: consent defaults to
//! granted until revoked, so the bridge works unattended while an
//! operator keeps a per-scope kill switch.
//!
//! # Checks
//!
//! | Check        | Refusal                                          |
//! |--------------|--------------------------------------------------|
//! | Rate limit   | `Rate limit exceeded for tool: <name>`           |
//! | Consent      | `User consent not granted for tool execution`    |
//!
//! # Audit trail
//!
//! Both consent decisions and execution outcomes are recorded through
//! an [`AuditSink`]. Payloads are masked before they reach a sink, so
//! passwords and tokens in tool arguments never land in a log.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wp_bridge::security::{SecurityGate, TracingSink};
//!
//! let gate = SecurityGate::new(Arc::new(TracingSink));
//!
//! gate.authorize_tool("conn-1", "claudeus_wp_content__get_posts").await?;
//! let result = run_the_tool().await;
//! gate.record_execution(
//!     "claudeus_wp_content__get_posts",
//!     &arguments,
//!     result.as_ref().err().map(|e| e.to_string()).as_deref(),
//! );
//! ```

pub mod audit;
pub mod consent;
pub mod limiter;
pub mod privacy;

pub use audit::{AuditEvent, AuditSink, AuditStatus, MemorySink, TracingSink};
pub use consent::{ConsentGate, ConsentKind};
pub use limiter::RateLimiter;
pub use privacy::{mask_sensitive, MASKED, SENSITIVE_FIELDS};

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{BridgeError, Result};

/// Facade over the consent gate, rate limiter and audit sink.
pub struct SecurityGate {
    consent: ConsentGate,
    limiter: RateLimiter,
    sink: Arc<dyn AuditSink>,
}

impl SecurityGate {
    /// Gate with default consent and rate limiting, recording to `sink`.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            consent: ConsentGate::new(),
            limiter: RateLimiter::new(),
            sink,
        }
    }

    /// Replace the rate limiter.
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Clear a tool call: rate limit first, then consent.
    pub async fn authorize_tool(&self, scope: &str, tool: &str) -> Result<()> {
        self.limiter.check(tool).await?;

        let description = format!("Execute tool: {tool}");
        let granted = self
            .consent
            .request(scope, ConsentKind::ToolExecution, &description, self.sink.as_ref())
            .await;
        if !granted {
            return Err(BridgeError::ConsentDenied);
        }
        Ok(())
    }

    /// Clear a resource read for `scope`.
    pub async fn authorize_resource(&self, scope: &str, resource: &str) -> Result<()> {
        let description = format!("Access resource: {resource}");
        let granted = self
            .consent
            .request(scope, ConsentKind::DataAccess, &description, self.sink.as_ref())
            .await;
        if !granted {
            return Err(BridgeError::ConsentDenied);
        }
        Ok(())
    }

    /// Record the outcome of an executed tool call.
    pub fn record_execution(&self, tool: &str, params: &Value, error: Option<&str>) {
        let status = if error.is_none() {
            AuditStatus::Success
        } else {
            AuditStatus::Failure
        };

        let mut details = json!({"tool": tool, "params": params});
        if let Some(error) = error {
            details["error"] = json!(error);
        }

        self.sink
            .record(AuditEvent::new("tool_execution", "execute", status).with_details(details));
    }

    /// Consent decisions, for revocation and inspection.
    pub fn consent(&self) -> &ConsentGate {
        &self.consent
    }

    /// The configured audit sink.
    pub fn sink(&self) -> &Arc<dyn AuditSink> {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn memory_gate() -> (SecurityGate, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let gate = SecurityGate::new(sink.clone())
            .with_limiter(RateLimiter::with_interval(Duration::ZERO));
        (gate, sink)
    }

    #[tokio::test]
    async fn test_authorize_allows_and_audits() {
        let (gate, sink) = memory_gate();

        gate.authorize_tool("conn-1", "claudeus_wp_content__get_posts")
            .await
            .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "consent");
        assert_eq!(events[0].operation, "TOOL_EXECUTION");
    }

    #[tokio::test]
    async fn test_rate_limit_precedes_consent() {
        let sink = Arc::new(MemorySink::new());
        let gate = SecurityGate::new(sink.clone())
            .with_limiter(RateLimiter::with_interval(Duration::from_secs(3600)));

        gate.authorize_tool("conn-1", "claudeus_wp_shop__get_orders")
            .await
            .unwrap();
        let err = gate
            .authorize_tool("conn-1", "claudeus_wp_shop__get_orders")
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::RateLimited(_)));

        // Only the first call reached the consent gate.
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_revoked_consent_refuses_execution() {
        let (gate, _sink) = memory_gate();

        gate.consent()
            .revoke("conn-1", ConsentKind::ToolExecution)
            .await;
        let err = gate
            .authorize_tool("conn-1", "claudeus_wp_content__get_posts")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "User consent not granted for tool execution"
        );
    }

    #[tokio::test]
    async fn test_record_execution_masks_and_carries_error() {
        let (gate, sink) = memory_gate();

        gate.record_execution(
            "claudeus_wp_content__create_post",
            &json!({"site": "prod", "token": "t-1"}),
            Some("HTTP Error 500"),
        );

        let events = sink.events();
        assert_eq!(events[0].kind, "tool_execution");
        assert_eq!(events[0].status, AuditStatus::Failure);
        assert_eq!(events[0].details["params"]["token"], MASKED);
        assert_eq!(events[0].details["error"], "HTTP Error 500");
    }

    #[tokio::test]
    async fn test_resource_access_uses_data_access_kind() {
        let (gate, sink) = memory_gate();

        gate.authorize_resource("conn-1", "wordpress_site")
            .await
            .unwrap();

        let events = sink.events();
        assert_eq!(events[0].operation, "DATA_ACCESS");
    }
}

//! Consent tracking per requesting scope.
//!
//! Consent is granted by default and only refused after an explicit
//! revocation, so an unattended bridge keeps working while an operator
//! retains a kill switch per scope and consent kind. Every decision is
//! recorded on the audit trail.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use super::audit::{AuditEvent, AuditSink, AuditStatus};

/// What a scope is consenting to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentKind {
    /// Reading site data and resources.
    DataAccess,
    /// Creating, updating or deleting site content.
    ContentModification,
    /// Running a tool at all.
    ToolExecution,
}

impl ConsentKind {
    /// Wire name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentKind::DataAccess => "DATA_ACCESS",
            ConsentKind::ContentModification => "CONTENT_MODIFICATION",
            ConsentKind::ToolExecution => "TOOL_EXECUTION",
        }
    }
}

/// Consent decisions per scope.
#[derive(Default)]
pub struct ConsentGate {
    grants: RwLock<HashMap<String, HashSet<ConsentKind>>>,
    revocations: RwLock<HashMap<String, HashSet<ConsentKind>>>,
}

impl ConsentGate {
    /// New gate with no recorded decisions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for consent on behalf of `scope`. Returns whether the
    /// operation may proceed and records the decision on `sink`.
    pub async fn request(
        &self,
        scope: &str,
        kind: ConsentKind,
        description: &str,
        sink: &dyn AuditSink,
    ) -> bool {
        let granted = !self.is_revoked(scope, kind).await;
        if granted {
            let mut grants = self.grants.write().await;
            grants.entry(scope.to_string()).or_default().insert(kind);
        }

        let status = if granted {
            AuditStatus::Success
        } else {
            AuditStatus::Failure
        };
        sink.record(
            AuditEvent::new("consent", kind.as_str(), status)
                .with_details(json!({"scope": scope, "description": description})),
        );

        granted
    }

    /// Explicitly grant, clearing any standing revocation.
    pub async fn grant(&self, scope: &str, kind: ConsentKind) {
        {
            let mut revocations = self.revocations.write().await;
            if let Some(revoked) = revocations.get_mut(scope) {
                revoked.remove(&kind);
            }
        }
        let mut grants = self.grants.write().await;
        grants.entry(scope.to_string()).or_default().insert(kind);
    }

    /// Revoke; later requests from this scope for this kind fail.
    pub async fn revoke(&self, scope: &str, kind: ConsentKind) {
        let mut revocations = self.revocations.write().await;
        revocations.entry(scope.to_string()).or_default().insert(kind);
    }

    /// Whether a grant has been recorded for this scope and kind.
    pub async fn has_consent(&self, scope: &str, kind: ConsentKind) -> bool {
        let grants = self.grants.read().await;
        grants.get(scope).is_some_and(|kinds| kinds.contains(&kind))
    }

    async fn is_revoked(&self, scope: &str, kind: ConsentKind) -> bool {
        let revocations = self.revocations.read().await;
        revocations
            .get(scope)
            .is_some_and(|kinds| kinds.contains(&kind))
    }
}

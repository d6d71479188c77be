//! Audit sink contract.
//!
//! The access-control crates emit structured audit events but do not own
//! their storage; delivery is best-effort from the caller's perspective.
//! Implementations live with the infrastructure (see `sentra-observability`
//! for a tracing-backed sink and an in-memory test double).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ResourceId, UserId};

/// Outcome classification of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Success,
    Denied,
    Violation,
}

/// A structured entry accepted by the audit sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: String,
    pub status: AuditStatus,
    pub user_id: Option<UserId>,
    pub target_resource_type: Option<String>,
    pub target_resource_id: Option<ResourceId>,
    pub details: Option<serde_json::Value>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, status: AuditStatus) -> Self {
        Self {
            action: action.into(),
            status,
            user_id: None,
            target_resource_type: None,
            target_resource_id: None,
            details: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_target(mut self, resource_type: impl Into<String>, resource_id: ResourceId) -> Self {
        self.target_resource_type = Some(resource_type.into());
        self.target_resource_id = Some(resource_id);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Destination for audit events.
///
/// `record` may touch infrastructure; faults surface as `anyhow::Error` and
/// callers in this workspace treat them as non-fatal (logged, never
/// propagated to the decision path).
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent) -> anyhow::Result<()>;
}

//! Audit-sink implementations.

use std::sync::Mutex;

use ::tracing::info;

use sentra_core::{AuditEvent, AuditSink};

/// Sink that emits each audit event as a structured tracing event.
///
/// Suitable where log aggregation is the audit backend; delivery is exactly
/// as durable as the installed subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) -> anyhow::Result<()> {
        info!(
            target: "sentra::audit",
            action = %event.action,
            status = ?event.status,
            user_id = event.user_id.as_ref().map(|u| u.as_str()),
            resource_type = event.target_resource_type.as_deref(),
            resource_id = event.target_resource_id.as_ref().map(|r| r.as_str()),
            details = event.details.as_ref().map(|d| d.to_string()),
            "audit"
        );
        Ok(())
    }
}

/// In-memory sink for tests: buffers events for inspection.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
        Ok(())
    }
}

/// Sink whose `record` always fails. Exists to test that callers treat
/// audit delivery as best-effort.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingAuditSink;

impl AuditSink for FailingAuditSink {
    fn record(&self, _event: AuditEvent) -> anyhow::Result<()> {
        anyhow::bail!("audit sink unavailable")
    }
}

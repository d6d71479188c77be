//! `sentra-observability` — tracing initialization and audit-sink
//! implementations.

pub mod sink;
pub mod tracing;

pub use sink::{FailingAuditSink, MemoryAuditSink, TracingAuditSink};
pub use tracing::init;

//! `sentra-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, and the audit-sink
//! contract shared by the access-control crates.

pub mod audit;
pub mod error;
pub mod id;

pub use audit::{AuditEvent, AuditSink, AuditStatus};
pub use error::{DomainError, DomainResult};
pub use id::{AssignmentId, GrantId, ResourceId, RoleId, RuleId, UserId};

//! `sentra-policy` — invariant enforcement for role/permission assignments.
//!
//! The guard is an advisory gate: callers consult it **before** persisting a
//! role or grant, and it reports violations as data rather than errors. It
//! performs no persistence and never learns whether the subsequent write
//! succeeded.

pub mod guard;
pub mod violation;

pub use guard::{AssignmentRequest, PolicyGuard};
pub use violation::{PolicyViolation, ViolationSubject};

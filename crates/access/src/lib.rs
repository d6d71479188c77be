//! `sentra-access` — attribute-based access rule evaluation and the
//! role/permission vocabulary.
//!
//! This crate is intentionally decoupled from HTTP and storage: rules are
//! plain data installed wholesale, evaluation is pure, and every decision
//! leaves an append-only audit trail entry.

pub mod cache;
pub mod condition;
pub mod evaluator;
pub mod permissions;
pub mod roles;
pub mod rule;

pub use cache::{compile, Predicate, PredicateCache};
pub use condition::{evaluate_condition, Condition, ConditionOperator, ConditionValue};
pub use evaluator::{AccessAuditEntry, AccessEvaluator};
pub use permissions::{is_permission, Permission, PermissionCategory};
pub use roles::{Role, RoleName, UserRoleAssignment};
pub use rule::{AccessRule, ConditionScope, EvaluationContext};

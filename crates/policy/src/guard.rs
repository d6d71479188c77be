//! The permission policy guard.
//!
//! Three independent invariant checks plus bulk validation and best-effort
//! violation reporting. Invariants enforced:
//!
//! - no self-assignment of `SUPER_ADMIN`;
//! - `ADMIN_ACCESS` attaches only to the `SUPER_ADMIN` role;
//! - `ADMIN_ACCESS` is never resource-scoped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use sentra_access::{Permission, RoleName};
use sentra_core::{AuditEvent, AuditSink, AuditStatus, UserId};

use crate::violation::{PolicyViolation, ViolationSubject};

/// One proposed assignment for bulk validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum AssignmentRequest {
    /// Attach `permission` to the role named `role`.
    RolePermission {
        role: RoleName,
        permission: Permission,
    },
    /// Grant `permission` to `user_id` scoped to a resource of
    /// `resource_type`.
    ResourcePermission {
        user_id: UserId,
        permission: Permission,
        resource_type: String,
    },
}

/// Advisory gate run before role/grant writes.
pub struct PolicyGuard {
    audit: Arc<dyn AuditSink>,
}

impl PolicyGuard {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self { audit }
    }

    /// A user may not assign `SUPER_ADMIN` to themselves. Every other
    /// assigner/role combination passes this check — other permission
    /// requirements are enforced elsewhere.
    pub fn check_role_assignment(
        &self,
        assigner: &UserId,
        user: &UserId,
        role: &RoleName,
    ) -> Option<PolicyViolation> {
        if role.is_super_admin() && assigner == user {
            return Some(PolicyViolation::for_user(
                user.clone(),
                Permission::AdminAccess,
                "Cannot self assign SUPER_ADMIN role",
            ));
        }
        None
    }

    /// `ADMIN_ACCESS` may only be attached to the `SUPER_ADMIN` role.
    pub fn check_role_permission_assignment(
        &self,
        role: &RoleName,
        permission: Permission,
    ) -> Option<PolicyViolation> {
        if permission == Permission::AdminAccess && !role.is_super_admin() {
            return Some(PolicyViolation::for_role(
                role.clone(),
                permission,
                "ADMIN_ACCESS can only be attached to the SUPER_ADMIN role",
            ));
        }
        None
    }

    /// `ADMIN_ACCESS` is global-only; it may never be granted on a resource.
    pub fn check_resource_permission_assignment(
        &self,
        user: &UserId,
        permission: Permission,
        _resource_type: &str,
    ) -> Option<PolicyViolation> {
        if permission == Permission::AdminAccess {
            return Some(PolicyViolation::for_user(
                user.clone(),
                permission,
                "ADMIN_ACCESS cannot be granted on resources",
            ));
        }
        None
    }

    /// Run the matching single check for every request and collect all
    /// violations. Never short-circuits: every request is checked.
    pub fn validate_bulk(&self, requests: &[AssignmentRequest]) -> Vec<PolicyViolation> {
        requests
            .iter()
            .filter_map(|request| match request {
                AssignmentRequest::RolePermission { role, permission } => {
                    self.check_role_permission_assignment(role, *permission)
                }
                AssignmentRequest::ResourcePermission {
                    user_id,
                    permission,
                    resource_type,
                } => self.check_resource_permission_assignment(
                    user_id,
                    *permission,
                    resource_type,
                ),
            })
            .collect()
    }

    /// Alias of [`Self::validate_bulk`], for call-site readability.
    pub fn check_compliance(&self, requests: &[AssignmentRequest]) -> Vec<PolicyViolation> {
        self.validate_bulk(requests)
    }

    /// Log each violation to the audit sink. Fire-and-forget: a failing sink
    /// is warned about locally and never propagated.
    pub fn report_violations(&self, violations: &[PolicyViolation]) {
        for violation in violations {
            let mut event = AuditEvent::new("policy.violation", AuditStatus::Violation);
            if let ViolationSubject::User { user_id } = &violation.subject {
                event = event.with_user(user_id.clone());
            }
            match serde_json::to_value(violation) {
                Ok(details) => event = event.with_details(details),
                Err(e) => warn!(error = %e, "failed to serialize policy violation"),
            }
            if let Err(e) = self.audit.record(event) {
                warn!(error = %e, reason = %violation.reason, "audit sink rejected violation report");
            }
        }
    }
}

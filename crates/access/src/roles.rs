//! Roles and user-role assignments.
//!
//! Roles are named bundles of permissions. The only hierarchy in this design
//! is the distinguished `SUPER_ADMIN` role, which implies every permission
//! globally; there is no general role-inheritance graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sentra_core::{AssignmentId, RoleId, UserId};

use crate::Permission;

/// Role name used for RBAC.
///
/// Names are opaque strings apart from the distinguished [`RoleName::SUPER_ADMIN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(std::borrow::Cow<'static, str>);

impl RoleName {
    pub const SUPER_ADMIN: RoleName = RoleName(std::borrow::Cow::Borrowed("SUPER_ADMIN"));

    pub fn new(name: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_super_admin(&self) -> bool {
        *self == Self::SUPER_ADMIN
    }
}

impl core::fmt::Display for RoleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleName {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

/// Named bundle of permissions assignable to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(id: RoleId, name: RoleName, permissions: Vec<Permission>) -> Self {
        Self {
            id,
            name,
            permissions,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Add a permission (idempotent).
    pub fn grant(&mut self, permission: Permission) {
        if !self.has_permission(permission) {
            self.permissions.push(permission);
        }
    }

    pub fn revoke(&mut self, permission: Permission) {
        self.permissions.retain(|p| *p != permission);
    }
}

/// A role granted to a user by an assigner, optionally time-bounded.
///
/// Expiry is a read-time check: nothing sweeps expired assignments, they
/// simply stop contributing permissions once `expires_at` passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleAssignment {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub assigned_by: UserId,
    pub assigned_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UserRoleAssignment {
    pub fn new(user_id: UserId, role_id: RoleId, assigned_by: UserId) -> Self {
        Self {
            id: AssignmentId::new(),
            user_id,
            role_id,
            assigned_by,
            assigned_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now)
    }
}

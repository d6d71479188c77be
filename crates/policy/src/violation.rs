//! Policy violations as data.

use serde::{Deserialize, Serialize};

use sentra_access::{Permission, RoleName};
use sentra_core::UserId;

/// Who a violation is about: the user being (dis)allowed something, or the
/// role a permission was to be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationSubject {
    User { user_id: UserId },
    Role { role: RoleName },
}

/// A rejected assignment. Returned (and optionally logged) by the guard,
/// never thrown and never persisted by the guard itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyViolation {
    pub subject: ViolationSubject,
    pub permission: Permission,
    pub reason: String,
}

impl PolicyViolation {
    pub fn for_user(user_id: UserId, permission: Permission, reason: impl Into<String>) -> Self {
        Self {
            subject: ViolationSubject::User { user_id },
            permission,
            reason: reason.into(),
        }
    }

    pub fn for_role(role: RoleName, permission: Permission, reason: impl Into<String>) -> Self {
        Self {
            subject: ViolationSubject::Role { role },
            permission,
            reason: reason.into(),
        }
    }
}

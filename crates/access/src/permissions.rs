//! Permission vocabulary.
//!
//! Permissions are a closed enumeration fixed at compile time. Categories
//! exist purely for display/grouping in admin surfaces; they have no effect
//! on evaluation semantics.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use sentra_core::DomainError;

/// Atomic capability token.
///
/// `ADMIN_ACCESS` is special: it is global-only and may never be attached to
/// a role other than `SUPER_ADMIN` or granted on a specific resource (see
/// `sentra-policy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    AdminAccess,
    ManageRoles,
    ManageUsers,
    InviteMembers,
    ManageTeams,
    ViewAuditLog,
    ViewAnalytics,
    ManageBilling,
    ExportData,
    ManageApiKeys,
    ManageWebhooks,
}

/// Display/grouping bucket for a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    Administration,
    Members,
    Compliance,
    Analytics,
    Billing,
    Integrations,
}

impl Permission {
    /// All permissions, in declaration order.
    pub const ALL: [Permission; 11] = [
        Permission::AdminAccess,
        Permission::ManageRoles,
        Permission::ManageUsers,
        Permission::InviteMembers,
        Permission::ManageTeams,
        Permission::ViewAuditLog,
        Permission::ViewAnalytics,
        Permission::ManageBilling,
        Permission::ExportData,
        Permission::ManageApiKeys,
        Permission::ManageWebhooks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AdminAccess => "ADMIN_ACCESS",
            Permission::ManageRoles => "MANAGE_ROLES",
            Permission::ManageUsers => "MANAGE_USERS",
            Permission::InviteMembers => "INVITE_MEMBERS",
            Permission::ManageTeams => "MANAGE_TEAMS",
            Permission::ViewAuditLog => "VIEW_AUDIT_LOG",
            Permission::ViewAnalytics => "VIEW_ANALYTICS",
            Permission::ManageBilling => "MANAGE_BILLING",
            Permission::ExportData => "EXPORT_DATA",
            Permission::ManageApiKeys => "MANAGE_API_KEYS",
            Permission::ManageWebhooks => "MANAGE_WEBHOOKS",
        }
    }

    pub fn category(&self) -> PermissionCategory {
        match self {
            Permission::AdminAccess | Permission::ManageRoles | Permission::ManageUsers => {
                PermissionCategory::Administration
            }
            Permission::InviteMembers | Permission::ManageTeams => PermissionCategory::Members,
            Permission::ViewAuditLog | Permission::ExportData => PermissionCategory::Compliance,
            Permission::ViewAnalytics => PermissionCategory::Analytics,
            Permission::ManageBilling => PermissionCategory::Billing,
            Permission::ManageApiKeys | Permission::ManageWebhooks => {
                PermissionCategory::Integrations
            }
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::validation(format!("unknown permission: {s}")))
    }
}

/// Whether `s` names a known permission.
pub fn is_permission(s: &str) -> bool {
    Permission::from_str(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for perm in Permission::ALL {
            let parsed: Permission = perm.as_str().parse().unwrap();
            assert_eq!(parsed, perm);

            let json = serde_json::to_string(&perm).unwrap();
            assert_eq!(json, format!("\"{}\"", perm.as_str()));
        }
    }

    #[test]
    fn is_permission_rejects_unknown_tokens() {
        assert!(is_permission("ADMIN_ACCESS"));
        assert!(is_permission("MANAGE_ROLES"));
        assert!(!is_permission("admin_access"));
        assert!(!is_permission("DELETE_EVERYTHING"));
    }

    #[test]
    fn every_permission_has_a_category() {
        // Categories are display-only; just pin the special one.
        assert_eq!(
            Permission::AdminAccess.category(),
            PermissionCategory::Administration
        );
    }
}

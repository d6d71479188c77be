//! Resource-scoped permission grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sentra_access::Permission;
use sentra_core::{GrantId, ResourceId, UserId};

/// Key of one resource instance: a type ("project", "organization", ...)
/// plus an identifier within that type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_type: String,
    pub resource_id: ResourceId,
}

impl ResourceRef {
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<ResourceId>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }
}

impl core::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}

/// A permission given to a user for one specific resource instance.
///
/// `ADMIN_ACCESS` never appears in a grant of this shape — it is global-only,
/// enforced both by the policy guard and at the resolver's mutation seam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePermissionGrant {
    pub id: GrantId,
    pub user_id: UserId,
    pub permission: Permission,
    pub resource: ResourceRef,
    pub granted_at: DateTime<Utc>,
}

impl ResourcePermissionGrant {
    pub fn new(user_id: UserId, permission: Permission, resource: ResourceRef) -> Self {
        Self {
            id: GrantId::new(),
            user_id,
            permission,
            resource,
            granted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_ref_display_is_type_slash_id() {
        let resource = ResourceRef::new("project", "p1");
        assert_eq!(resource.to_string(), "project/p1");
    }

    #[test]
    fn refs_key_on_both_type_and_id() {
        assert_ne!(
            ResourceRef::new("project", "x"),
            ResourceRef::new("organization", "x")
        );
    }
}

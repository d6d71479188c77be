//! Store contracts and in-memory implementations.
//!
//! The resolver reads grants, relationship edges, and role assignments
//! through these traits; production backends adapt their persistence to
//! them. Faults surface as `anyhow::Error` — the resolver is correct in
//! their absence and does not define their recovery.

use std::collections::HashMap;
use std::sync::RwLock;

use sentra_access::{Permission, Role, UserRoleAssignment};
use sentra_core::{RoleId, UserId};

use crate::grant::{ResourcePermissionGrant, ResourceRef};
use crate::relationship::ResourceRelationship;

/// Read/write access to direct resource-scoped grants.
pub trait GrantStore: Send + Sync {
    fn grants_for(
        &self,
        user: &UserId,
        resource: &ResourceRef,
    ) -> anyhow::Result<Vec<ResourcePermissionGrant>>;

    fn insert(&self, grant: ResourcePermissionGrant) -> anyhow::Result<()>;

    /// Remove a grant; returns whether one existed.
    fn remove(
        &self,
        user: &UserId,
        resource: &ResourceRef,
        permission: Permission,
    ) -> anyhow::Result<bool>;
}

/// Read/write access to parent/child relationship edges.
pub trait RelationshipStore: Send + Sync {
    fn parents_of(&self, child: &ResourceRef) -> anyhow::Result<Vec<ResourceRelationship>>;

    fn children_of(&self, parent: &ResourceRef) -> anyhow::Result<Vec<ResourceRelationship>>;

    fn link(&self, relationship: ResourceRelationship) -> anyhow::Result<()>;

    /// Remove an edge; returns whether one existed.
    fn unlink(&self, parent: &ResourceRef, child: &ResourceRef) -> anyhow::Result<bool>;
}

/// Read access to roles and user-role assignments.
pub trait RoleStore: Send + Sync {
    fn assignments_for(&self, user: &UserId) -> anyhow::Result<Vec<UserRoleAssignment>>;

    fn role(&self, id: &RoleId) -> anyhow::Result<Option<Role>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory implementations
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryGrantStore {
    grants: RwLock<Vec<ResourcePermissionGrant>>,
}

impl InMemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GrantStore for InMemoryGrantStore {
    fn grants_for(
        &self,
        user: &UserId,
        resource: &ResourceRef,
    ) -> anyhow::Result<Vec<ResourcePermissionGrant>> {
        let grants = self.grants.read().unwrap_or_else(|e| e.into_inner());
        Ok(grants
            .iter()
            .filter(|g| g.user_id == *user && g.resource == *resource)
            .cloned()
            .collect())
    }

    fn insert(&self, grant: ResourcePermissionGrant) -> anyhow::Result<()> {
        self.grants
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(grant);
        Ok(())
    }

    fn remove(
        &self,
        user: &UserId,
        resource: &ResourceRef,
        permission: Permission,
    ) -> anyhow::Result<bool> {
        let mut grants = self.grants.write().unwrap_or_else(|e| e.into_inner());
        let before = grants.len();
        grants.retain(|g| {
            !(g.user_id == *user && g.resource == *resource && g.permission == permission)
        });
        Ok(grants.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryRelationshipStore {
    edges: RwLock<Vec<ResourceRelationship>>,
}

impl InMemoryRelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RelationshipStore for InMemoryRelationshipStore {
    fn parents_of(&self, child: &ResourceRef) -> anyhow::Result<Vec<ResourceRelationship>> {
        let edges = self.edges.read().unwrap_or_else(|e| e.into_inner());
        Ok(edges.iter().filter(|e| e.child == *child).cloned().collect())
    }

    fn children_of(&self, parent: &ResourceRef) -> anyhow::Result<Vec<ResourceRelationship>> {
        let edges = self.edges.read().unwrap_or_else(|e| e.into_inner());
        Ok(edges
            .iter()
            .filter(|e| e.parent == *parent)
            .cloned()
            .collect())
    }

    fn link(&self, relationship: ResourceRelationship) -> anyhow::Result<()> {
        self.edges
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(relationship);
        Ok(())
    }

    fn unlink(&self, parent: &ResourceRef, child: &ResourceRef) -> anyhow::Result<bool> {
        let mut edges = self.edges.write().unwrap_or_else(|e| e.into_inner());
        let before = edges.len();
        edges.retain(|e| !(e.parent == *parent && e.child == *child));
        Ok(edges.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryRoleStore {
    roles: RwLock<HashMap<RoleId, Role>>,
    assignments: RwLock<Vec<UserRoleAssignment>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_role(&self, role: Role) {
        self.roles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(role.id.clone(), role);
    }

    pub fn assign(&self, assignment: UserRoleAssignment) {
        self.assignments
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(assignment);
    }
}

impl RoleStore for InMemoryRoleStore {
    fn assignments_for(&self, user: &UserId) -> anyhow::Result<Vec<UserRoleAssignment>> {
        let assignments = self.assignments.read().unwrap_or_else(|e| e.into_inner());
        Ok(assignments
            .iter()
            .filter(|a| a.user_id == *user)
            .cloned()
            .collect())
    }

    fn role(&self, id: &RoleId) -> anyhow::Result<Option<Role>> {
        let roles = self.roles.read().unwrap_or_else(|e| e.into_inner());
        Ok(roles.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_access::RoleName;

    #[test]
    fn grant_store_filters_by_user_and_resource() {
        let store = InMemoryGrantStore::new();
        let project = ResourceRef::new("project", "p1");
        let other = ResourceRef::new("project", "p2");

        store
            .insert(ResourcePermissionGrant::new(
                UserId::new("u1"),
                Permission::ExportData,
                project.clone(),
            ))
            .unwrap();

        assert_eq!(store.grants_for(&UserId::new("u1"), &project).unwrap().len(), 1);
        assert!(store.grants_for(&UserId::new("u1"), &other).unwrap().is_empty());
        assert!(store.grants_for(&UserId::new("u2"), &project).unwrap().is_empty());
    }

    #[test]
    fn remove_reports_whether_a_grant_existed() {
        let store = InMemoryGrantStore::new();
        let project = ResourceRef::new("project", "p1");
        store
            .insert(ResourcePermissionGrant::new(
                UserId::new("u1"),
                Permission::ExportData,
                project.clone(),
            ))
            .unwrap();

        assert!(store
            .remove(&UserId::new("u1"), &project, Permission::ExportData)
            .unwrap());
        assert!(!store
            .remove(&UserId::new("u1"), &project, Permission::ExportData)
            .unwrap());
    }

    #[test]
    fn role_store_round_trips_roles_and_assignments() {
        let store = InMemoryRoleStore::new();
        store.upsert_role(Role::new(
            RoleId::new("r1"),
            RoleName::new("EDITOR"),
            vec![Permission::ManageTeams],
        ));
        store.assign(UserRoleAssignment::new(
            UserId::new("u1"),
            RoleId::new("r1"),
            UserId::new("admin"),
        ));

        assert!(store.role(&RoleId::new("r1")).unwrap().is_some());
        assert!(store.role(&RoleId::new("missing")).unwrap().is_none());
        assert_eq!(store.assignments_for(&UserId::new("u1")).unwrap().len(), 1);
    }
}

//! Effective-permission resolution.
//!
//! The effective permission set for a (user, resource) pair is the union of
//! direct grants on that resource and grants inherited from every ancestor
//! reachable through relationship edges (child→parent, transitively).
//!
//! Global (role-derived) checks and resource-scoped checks are distinct code
//! paths; neither falls back to the other implicitly.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use sentra_access::Permission;
use sentra_core::{DomainError, UserId};

use crate::grant::{ResourcePermissionGrant, ResourceRef};
use crate::relationship::ResourceRelationship;
use crate::store::{GrantStore, RelationshipStore, RoleStore};

/// Resolves effective permissions over the resource hierarchy and the
/// role-derived global path. Stores are injected at construction.
pub struct PermissionResolver {
    grants: Arc<dyn GrantStore>,
    relationships: Arc<dyn RelationshipStore>,
    roles: Arc<dyn RoleStore>,
}

impl PermissionResolver {
    pub fn new(
        grants: Arc<dyn GrantStore>,
        relationships: Arc<dyn RelationshipStore>,
        roles: Arc<dyn RoleStore>,
    ) -> Self {
        Self {
            grants,
            relationships,
            roles,
        }
    }

    /// Union of direct and inherited permissions for `user` on `resource`.
    ///
    /// The ancestor walk tolerates diamonds (an ancestor reachable via two
    /// paths is merged once) but a cycle is a data-integrity bug in the
    /// relationship store and surfaces as [`DomainError::InvariantViolation`].
    pub fn effective_permissions(
        &self,
        user: &UserId,
        resource: &ResourceRef,
    ) -> anyhow::Result<HashSet<Permission>> {
        let mut effective = HashSet::new();
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        self.collect(user, resource, &mut path, &mut visited, &mut effective)?;
        debug!(
            user = %user,
            resource = %resource,
            count = effective.len(),
            "resolved effective permissions"
        );
        Ok(effective)
    }

    fn collect(
        &self,
        user: &UserId,
        resource: &ResourceRef,
        path: &mut Vec<ResourceRef>,
        visited: &mut HashSet<ResourceRef>,
        effective: &mut HashSet<Permission>,
    ) -> anyhow::Result<()> {
        if path.contains(resource) {
            warn!(resource = %resource, "resource relationship cycle detected");
            return Err(DomainError::invariant(format!(
                "resource relationship cycle at {resource}"
            ))
            .into());
        }
        if !visited.insert(resource.clone()) {
            // Already merged via another path (diamond).
            return Ok(());
        }

        for grant in self.grants.grants_for(user, resource)? {
            effective.insert(grant.permission);
        }

        path.push(resource.clone());
        for edge in self.relationships.parents_of(resource)? {
            self.collect(user, &edge.parent, path, visited, effective)?;
        }
        path.pop();
        Ok(())
    }

    /// Direct child edges of `parent` (admin tree rendering).
    pub fn children(&self, parent: &ResourceRef) -> anyhow::Result<Vec<ResourceRelationship>> {
        self.relationships.children_of(parent)
    }

    /// Grant `permission` to `user` on `resource` (direct grant only, never
    /// a relationship edge).
    ///
    /// `ADMIN_ACCESS` is global-only; granting it here is an invariant
    /// violation regardless of what the policy guard was told.
    pub fn assign(
        &self,
        user: &UserId,
        permission: Permission,
        resource: &ResourceRef,
    ) -> anyhow::Result<ResourcePermissionGrant> {
        if permission == Permission::AdminAccess {
            return Err(DomainError::invariant(
                "ADMIN_ACCESS cannot be granted on resources",
            )
            .into());
        }

        let grant = ResourcePermissionGrant::new(user.clone(), permission, resource.clone());
        self.grants.insert(grant.clone())?;
        debug!(user = %user, resource = %resource, permission = %permission, "granted");
        Ok(grant)
    }

    /// Remove a direct grant; returns whether one existed.
    pub fn revoke(
        &self,
        user: &UserId,
        permission: Permission,
        resource: &ResourceRef,
    ) -> anyhow::Result<bool> {
        self.grants.remove(user, resource, permission)
    }

    /// Global path: permissions derived from active (non-expired) role
    /// assignments only. `SUPER_ADMIN` implies every permission.
    pub fn has_global_permission(
        &self,
        user: &UserId,
        permission: Permission,
    ) -> anyhow::Result<bool> {
        let now = chrono::Utc::now();
        for assignment in self.roles.assignments_for(user)? {
            if !assignment.is_active(now) {
                continue;
            }
            let Some(role) = self.roles.role(&assignment.role_id)? else {
                continue;
            };
            if role.name.is_super_admin() || role.has_permission(permission) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Resource path: membership in the effective set for `resource`.
    pub fn has_resource_permission(
        &self,
        user: &UserId,
        permission: Permission,
        resource: &ResourceRef,
    ) -> anyhow::Result<bool> {
        Ok(self.effective_permissions(user, resource)?.contains(&permission))
    }

    /// Explicit OR of the resource and global paths, for call sites that
    /// want "allowed anywhere" semantics.
    pub fn has_permission_anywhere(
        &self,
        user: &UserId,
        permission: Permission,
        resource: &ResourceRef,
    ) -> anyhow::Result<bool> {
        Ok(self.has_resource_permission(user, permission, resource)?
            || self.has_global_permission(user, permission)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::RelationshipKind;
    use crate::store::{InMemoryGrantStore, InMemoryRelationshipStore, InMemoryRoleStore};
    use chrono::{Duration, Utc};
    use sentra_access::{Role, RoleName, UserRoleAssignment};
    use sentra_core::RoleId;

    struct Fixture {
        grants: Arc<InMemoryGrantStore>,
        relationships: Arc<InMemoryRelationshipStore>,
        roles: Arc<InMemoryRoleStore>,
        resolver: PermissionResolver,
    }

    fn fixture() -> Fixture {
        let grants = Arc::new(InMemoryGrantStore::new());
        let relationships = Arc::new(InMemoryRelationshipStore::new());
        let roles = Arc::new(InMemoryRoleStore::new());
        let resolver = PermissionResolver::new(
            Arc::clone(&grants) as Arc<dyn GrantStore>,
            Arc::clone(&relationships) as Arc<dyn RelationshipStore>,
            Arc::clone(&roles) as Arc<dyn RoleStore>,
        );
        Fixture {
            grants,
            relationships,
            roles,
            resolver,
        }
    }

    fn link(f: &Fixture, parent: &ResourceRef, child: &ResourceRef) {
        f.relationships
            .link(ResourceRelationship::new(
                parent.clone(),
                child.clone(),
                RelationshipKind::OWNED_BY,
            ))
            .unwrap();
    }

    #[test]
    fn direct_grants_appear_in_the_effective_set() {
        let f = fixture();
        let user = UserId::new("u1");
        let project = ResourceRef::new("project", "p1");

        f.resolver
            .assign(&user, Permission::ExportData, &project)
            .unwrap();

        let effective = f.resolver.effective_permissions(&user, &project).unwrap();
        assert_eq!(effective, HashSet::from([Permission::ExportData]));
    }

    #[test]
    fn permissions_inherit_transitively_from_ancestors() {
        let f = fixture();
        let user = UserId::new("u1");
        let org = ResourceRef::new("organization", "o1");
        let team = ResourceRef::new("team", "t1");
        let project = ResourceRef::new("project", "p1");
        link(&f, &org, &team);
        link(&f, &team, &project);

        f.resolver
            .assign(&user, Permission::ViewAnalytics, &org)
            .unwrap();
        f.resolver
            .assign(&user, Permission::ManageTeams, &team)
            .unwrap();
        f.resolver
            .assign(&user, Permission::ExportData, &project)
            .unwrap();

        let effective = f.resolver.effective_permissions(&user, &project).unwrap();
        assert_eq!(
            effective,
            HashSet::from([
                Permission::ViewAnalytics,
                Permission::ManageTeams,
                Permission::ExportData
            ])
        );

        // Inheritance flows downward only.
        let at_org = f.resolver.effective_permissions(&user, &org).unwrap();
        assert_eq!(at_org, HashSet::from([Permission::ViewAnalytics]));
    }

    #[test]
    fn diamond_shaped_ancestry_is_merged_not_an_error() {
        let f = fixture();
        let user = UserId::new("u1");
        let org = ResourceRef::new("organization", "o1");
        let team_a = ResourceRef::new("team", "a");
        let team_b = ResourceRef::new("team", "b");
        let project = ResourceRef::new("project", "p1");
        link(&f, &org, &team_a);
        link(&f, &org, &team_b);
        link(&f, &team_a, &project);
        link(&f, &team_b, &project);

        f.resolver
            .assign(&user, Permission::ViewAnalytics, &org)
            .unwrap();

        let effective = f.resolver.effective_permissions(&user, &project).unwrap();
        assert_eq!(effective, HashSet::from([Permission::ViewAnalytics]));
    }

    #[test]
    fn relationship_cycle_is_an_integrity_error_not_a_hang() {
        let f = fixture();
        let user = UserId::new("u1");
        let a = ResourceRef::new("project", "a");
        let b = ResourceRef::new("project", "b");
        link(&f, &a, &b);
        link(&f, &b, &a);

        let err = f.resolver.effective_permissions(&user, &a).unwrap_err();
        let domain = err.downcast_ref::<DomainError>().unwrap();
        assert!(matches!(domain, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn assign_rejects_admin_access_without_touching_the_store() {
        let f = fixture();
        let user = UserId::new("u1");
        let project = ResourceRef::new("project", "p1");

        let err = f
            .resolver
            .assign(&user, Permission::AdminAccess, &project)
            .unwrap_err();
        assert!(err.downcast_ref::<DomainError>().is_some());
        assert!(f.grants.grants_for(&user, &project).unwrap().is_empty());
    }

    #[test]
    fn revoke_removes_only_the_direct_grant() {
        let f = fixture();
        let user = UserId::new("u1");
        let org = ResourceRef::new("organization", "o1");
        let project = ResourceRef::new("project", "p1");
        link(&f, &org, &project);

        f.resolver
            .assign(&user, Permission::ExportData, &org)
            .unwrap();
        f.resolver
            .assign(&user, Permission::ExportData, &project)
            .unwrap();

        assert!(f
            .resolver
            .revoke(&user, Permission::ExportData, &project)
            .unwrap());
        // Inherited grant remains visible at the project.
        assert!(f
            .resolver
            .has_resource_permission(&user, Permission::ExportData, &project)
            .unwrap());
        assert!(!f
            .resolver
            .revoke(&user, Permission::ExportData, &project)
            .unwrap());
    }

    #[test]
    fn children_lists_direct_edges_only() {
        let f = fixture();
        let org = ResourceRef::new("organization", "o1");
        let team = ResourceRef::new("team", "t1");
        let project = ResourceRef::new("project", "p1");
        link(&f, &org, &team);
        link(&f, &team, &project);

        let children = f.resolver.children(&org).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].child, team);
    }

    #[test]
    fn global_path_uses_active_roles_only() {
        let f = fixture();
        let user = UserId::new("u1");
        f.roles.upsert_role(Role::new(
            RoleId::new("analyst"),
            RoleName::new("ANALYST"),
            vec![Permission::ViewAnalytics],
        ));

        let expired = UserRoleAssignment::new(
            user.clone(),
            RoleId::new("analyst"),
            UserId::new("admin"),
        )
        .expiring_at(Utc::now() - Duration::hours(1));
        f.roles.assign(expired);

        assert!(!f
            .resolver
            .has_global_permission(&user, Permission::ViewAnalytics)
            .unwrap());

        f.roles.assign(UserRoleAssignment::new(
            user.clone(),
            RoleId::new("analyst"),
            UserId::new("admin"),
        ));
        assert!(f
            .resolver
            .has_global_permission(&user, Permission::ViewAnalytics)
            .unwrap());
        assert!(!f
            .resolver
            .has_global_permission(&user, Permission::ManageBilling)
            .unwrap());
    }

    #[test]
    fn super_admin_implies_every_permission_globally() {
        let f = fixture();
        let user = UserId::new("root");
        f.roles.upsert_role(Role::new(
            RoleId::new("super"),
            RoleName::SUPER_ADMIN,
            vec![],
        ));
        f.roles.assign(UserRoleAssignment::new(
            user.clone(),
            RoleId::new("super"),
            UserId::new("bootstrap"),
        ));

        for permission in Permission::ALL {
            assert!(f.resolver.has_global_permission(&user, permission).unwrap());
        }
    }

    #[test]
    fn resource_path_does_not_fall_back_to_global() {
        let f = fixture();
        let user = UserId::new("u1");
        let project = ResourceRef::new("project", "p1");
        f.roles.upsert_role(Role::new(
            RoleId::new("analyst"),
            RoleName::new("ANALYST"),
            vec![Permission::ViewAnalytics],
        ));
        f.roles.assign(UserRoleAssignment::new(
            user.clone(),
            RoleId::new("analyst"),
            UserId::new("admin"),
        ));

        assert!(!f
            .resolver
            .has_resource_permission(&user, Permission::ViewAnalytics, &project)
            .unwrap());
        // The explicit composition sees both paths.
        assert!(f
            .resolver
            .has_permission_anywhere(&user, Permission::ViewAnalytics, &project)
            .unwrap());
    }
}

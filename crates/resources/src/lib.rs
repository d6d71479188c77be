//! `sentra-resources` — resource-scoped permission grants, resource
//! relationships, and hierarchical effective-permission resolution.
//!
//! Persistence is behind store traits; the in-memory implementations here
//! serve tests and single-process embedding.

pub mod grant;
pub mod relationship;
pub mod resolver;
pub mod store;

pub use grant::{ResourcePermissionGrant, ResourceRef};
pub use relationship::{RelationshipKind, ResourceRelationship};
pub use resolver::PermissionResolver;
pub use store::{
    GrantStore, InMemoryGrantStore, InMemoryRelationshipStore, InMemoryRoleStore,
    RelationshipStore, RoleStore,
};

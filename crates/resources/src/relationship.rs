//! Directed parent/child edges between resources.
//!
//! A child inherits permission context from its parents. Edges are created
//! and removed explicitly by the collaborator that owns resource lifecycles;
//! nothing here cascades deletes.

use serde::{Deserialize, Serialize};

use crate::grant::ResourceRef;

/// Label on a relationship edge (e.g. "owned_by", "member_of").
///
/// Opaque at this layer; resolution treats every kind identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipKind(std::borrow::Cow<'static, str>);

impl RelationshipKind {
    pub const OWNED_BY: RelationshipKind =
        RelationshipKind(std::borrow::Cow::Borrowed("owned_by"));
    pub const MEMBER_OF: RelationshipKind =
        RelationshipKind(std::borrow::Cow::Borrowed("member_of"));

    pub fn new(kind: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One directed edge: `child` inherits from `parent`.
///
/// Many children per parent; a child may have multiple parents of different
/// types. The graph is expected to be acyclic — resolution still checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRelationship {
    pub parent: ResourceRef,
    pub child: ResourceRef,
    pub kind: RelationshipKind,
}

impl ResourceRelationship {
    pub fn new(parent: ResourceRef, child: ResourceRef, kind: RelationshipKind) -> Self {
        Self {
            parent,
            child,
            kind,
        }
    }
}

//! Named relationships between nodes of one snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Kind of a relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// `n1` declares `n2`.
    Declares,
    /// `n1` references `n2`.
    Uses,
    /// `n1` extends or implements `n2`.
    Subtype,
}

/// A relationship `kind(n1, n2)`.
///
/// Equality covers all three fields, so a set of relationships holds each
/// pair at most once regardless of insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CstNodeRelationship {
    kind: RelationshipKind,
    n1: NodeId,
    n2: NodeId,
}

impl CstNodeRelationship {
    pub fn new(kind: RelationshipKind, n1: NodeId, n2: NodeId) -> Self {
        CstNodeRelationship { kind, n1, n2 }
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn n1(&self) -> NodeId {
        self.n1
    }

    pub fn n2(&self) -> NodeId {
        self.n2
    }

    /// Returns true if either end is `id`.
    pub fn involves(&self, id: NodeId) -> bool {
        self.n1 == id || self.n2 == id
    }
}

impl fmt::Display for CstNodeRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({}, {})", self.kind, self.n1, self.n2)
    }
}

//! Concrete structural trees.
//!
//! A [`CstRoot`] holds the structure of one snapshot of a source tree: the
//! top-level nodes (each owning its subtree), the relationships between
//! nodes, and the tokenized source of every file. Roots are built once by a
//! language parser and read-only afterwards.

mod node;
mod relationship;
mod snapshot;
mod tokenized;

pub use node::{CstNode, Location, NodeFamily, NodeId, NodeType};
pub use relationship::{CstNodeRelationship, RelationshipKind};
pub use tokenized::{Token, TokenizedSource};

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The structural tree of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CstRoot {
    #[serde(default)]
    nodes: Vec<CstNode>,
    #[serde(default)]
    relationships: BTreeSet<CstNodeRelationship>,
    #[serde(default)]
    tokenized_sources: BTreeMap<String, TokenizedSource>,
}

impl CstRoot {
    /// Creates an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a top-level node.
    pub fn add_node(&mut self, node: CstNode) {
        self.nodes.push(node);
    }

    /// Registers the tokens of a file, replacing any previous entry for it.
    pub fn add_tokenized_file(&mut self, source: TokenizedSource) {
        self.tokenized_sources
            .insert(source.file().to_string(), source);
    }

    /// Adds a relationship. Returns false if it was already present.
    pub fn add_relationship(&mut self, relationship: CstNodeRelationship) -> bool {
        self.relationships.insert(relationship)
    }

    /// Returns the top-level nodes.
    pub fn nodes(&self) -> &[CstNode] {
        &self.nodes
    }

    pub fn relationships(&self) -> &BTreeSet<CstNodeRelationship> {
        &self.relationships
    }

    /// Returns the relationships of `kind` that start at `id`.
    pub fn relationships_from(
        &self,
        kind: RelationshipKind,
        id: NodeId,
    ) -> impl Iterator<Item = &CstNodeRelationship> + '_ {
        self.relationships
            .iter()
            .filter(move |r| r.kind() == kind && r.n1() == id)
    }

    pub fn tokenized_source(&self, file: &str) -> Option<&TokenizedSource> {
        self.tokenized_sources.get(file)
    }

    pub fn tokenized_sources(&self) -> &BTreeMap<String, TokenizedSource> {
        &self.tokenized_sources
    }

    /// Depth-first traversal of every node with its depth.
    ///
    /// Parents come before children; top-level nodes have depth 0.
    pub fn traverse(&self) -> Traversal<'_> {
        Traversal::new(&self.nodes)
    }

    /// Total number of nodes at all depths.
    pub fn node_count(&self) -> usize {
        self.traverse().count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds a node by id.
    pub fn find(&self, id: NodeId) -> Option<&CstNode> {
        self.traverse().map(|(n, _)| n).find(|n| n.id() == id)
    }

    /// Returns the chain of nodes from a top-level node down to `id`.
    pub fn path_to(&self, id: NodeId) -> Option<Vec<&CstNode>> {
        let mut path: Vec<&CstNode> = Vec::new();
        for (node, depth) in self.traverse() {
            path.truncate(depth);
            path.push(node);
            if node.id() == id {
                return Some(path);
            }
        }
        None
    }

    /// Returns the parent of `id`, or None for top-level and unknown nodes.
    pub fn parent_of(&self, id: NodeId) -> Option<&CstNode> {
        let path = self.path_to(id)?;
        path.len().checked_sub(2).map(|i| path[i])
    }

    /// Returns the number of ancestors of `id`.
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        self.traverse().find(|(n, _)| n.id() == id).map(|(_, d)| d)
    }

    /// Local names from the top-level node down to `id`.
    pub fn node_path(&self, id: NodeId) -> Vec<&str> {
        self.path_to(id)
            .map(|path| path.into_iter().map(CstNode::local_name).collect())
            .unwrap_or_default()
    }

    /// Returns the tokens that belong to `node` itself.
    ///
    /// These are the tokens inside the node's body span that are not covered
    /// by any of its children. A node whose file has no tokenized source has
    /// no tokens.
    pub fn own_tokens<'a>(&'a self, node: &CstNode) -> Vec<&'a str> {
        let location = node.location();
        let Some(source) = self.tokenized_source(&location.file) else {
            return Vec::new();
        };
        source
            .tokens_in(location.body_begin, location.body_end)
            .iter()
            .filter(|t| !node.child_covers(t.start))
            .map(|t| t.text.as_str())
            .collect()
    }

    /// Fails on the first node id seen twice.
    ///
    /// Ids are unique across the whole snapshot, not just within a file:
    /// matches, removals and additions are reported by id.
    pub fn check_unique_ids(&self) -> Result<()> {
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        for (node, _) in self.traverse() {
            if !seen.insert(node.id()) {
                return Err(Error::DuplicateNodeId(node.id().0));
            }
        }
        Ok(())
    }

    /// Checks the invariants the matcher relies on.
    ///
    /// Node ids must be unique, every node's file must have a tokenized
    /// source and spans must not be inverted.
    pub fn validate(&self) -> Result<()> {
        self.check_unique_ids()?;
        for (node, _) in self.traverse() {
            let id = node.id();
            let location = node.location();
            if !self.tokenized_sources.contains_key(&location.file) {
                return Err(Error::MissingTokenizedSource {
                    node: id.0,
                    file: location.file.clone(),
                });
            }
            if location.begin > location.end {
                return Err(Error::InvalidSpan {
                    node: id.0,
                    begin: location.begin,
                    end: location.end,
                });
            }
            if location.body_begin > location.body_end {
                return Err(Error::InvalidSpan {
                    node: id.0,
                    begin: location.body_begin,
                    end: location.body_end,
                });
            }
        }
        Ok(())
    }
}

/// Iterative depth-first traversal yielding `(node, depth)` pairs.
///
/// Single pass: call [`CstRoot::traverse`] again to restart.
pub struct Traversal<'a> {
    /// Nodes still to visit, next one on top.
    stack: Vec<(&'a CstNode, usize)>,
}

impl<'a> Traversal<'a> {
    fn new(nodes: &'a [CstNode]) -> Self {
        Traversal {
            stack: nodes.iter().rev().map(|n| (n, 0)).collect(),
        }
    }
}

impl<'a> Iterator for Traversal<'a> {
    type Item = (&'a CstNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        // Reverse so the first child is visited first
        self.stack
            .extend(node.children().iter().rev().map(|c| (c, depth + 1)));
        Some((node, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //       A (0)
    //      /    \
    //    m1 (1)  m2 (1)
    //     |
    //    b (2)
    //   C (0)
    fn sample_root() -> CstRoot {
        let mut source = TokenizedSource::new("A.java");
        let (a_begin, _) = source.push_tokens(["class", "A"]);
        let (m1_begin, _) = source.push_tokens(["void", "m1"]);
        let (b_begin, b_end) = source.push_tokens(["return", "x"]);
        let (_, m1_end) = source.push_tokens(["end"]);
        let (m2_begin, m2_end) = source.push_tokens(["void", "m2"]);
        let (c_begin, c_end) = source.push_tokens(["class", "C"]);

        let b = CstNode::new(4, NodeType::Block, Location::new("A.java", b_begin, b_end, 3));
        let m1 = CstNode::new(2, NodeType::Method, Location::new("A.java", m1_begin, m1_end, 2))
            .with_name("m1")
            .with_child(b);
        let m2 = CstNode::new(3, NodeType::Method, Location::new("A.java", m2_begin, m2_end, 5))
            .with_name("m2");
        let a = CstNode::new(1, NodeType::Class, Location::new("A.java", a_begin, m2_end, 1))
            .with_name("A")
            .with_child(m1)
            .with_child(m2);
        let c = CstNode::new(5, NodeType::Class, Location::new("A.java", c_begin, c_end, 6))
            .with_name("C");

        let mut root = CstRoot::new();
        root.add_node(a);
        root.add_node(c);
        root.add_tokenized_file(source);
        root
    }

    #[test]
    fn test_traversal_order_and_depth() {
        let root = sample_root();
        let visited: Vec<(u32, usize)> = root.traverse().map(|(n, d)| (n.id().0, d)).collect();
        assert_eq!(visited, vec![(1, 0), (2, 1), (4, 2), (3, 1), (5, 0)]);
        assert_eq!(root.node_count(), 5);
    }

    #[test]
    fn test_traversal_empty_root() {
        let root = CstRoot::new();
        assert_eq!(root.traverse().count(), 0);
        assert!(root.is_empty());
    }

    #[test]
    fn test_parent_depth_and_path() {
        let root = sample_root();
        assert_eq!(root.parent_of(NodeId(4)).map(CstNode::id), Some(NodeId(2)));
        assert!(root.parent_of(NodeId(1)).is_none());
        assert_eq!(root.depth_of(NodeId(4)), Some(2));
        assert_eq!(root.node_path(NodeId(4)), vec!["A", "m1", ""]);
        assert!(root.node_path(NodeId(99)).is_empty());
    }

    #[test]
    fn test_own_tokens_exclude_children() {
        let root = sample_root();
        let a = root.find(NodeId(1)).unwrap();
        let m1 = root.find(NodeId(2)).unwrap();

        assert_eq!(root.own_tokens(a), vec!["class", "A"]);
        assert_eq!(root.own_tokens(m1), vec!["void", "m1", "end"]);
    }

    #[test]
    fn test_own_tokens_respect_body_span() {
        let mut source = TokenizedSource::new("f.js");
        let (begin, end) = source.push_tokens(["function", "f", "return", "1"]);
        let node = CstNode::new(1, NodeType::Function, Location::new("f.js", begin, end, 1).with_body(11, end));
        let mut root = CstRoot::new();
        root.add_tokenized_file(source);

        assert_eq!(root.own_tokens(&node), vec!["return", "1"]);
    }

    #[test]
    fn test_validate_detects_duplicates() {
        let mut root = sample_root();
        root.add_node(CstNode::new(1, NodeType::Class, Location::new("A.java", 0, 1, 1)));
        assert!(matches!(root.validate(), Err(Error::DuplicateNodeId(1))));
    }

    #[test]
    fn test_validate_detects_missing_source() {
        let mut root = sample_root();
        root.add_node(CstNode::new(9, NodeType::Class, Location::new("B.java", 0, 1, 1)));
        assert!(matches!(
            root.validate(),
            Err(Error::MissingTokenizedSource { node: 9, .. })
        ));
        assert!(sample_root().validate().is_ok());
    }

    #[test]
    fn test_relationships_are_a_set() {
        let mut root = sample_root();
        let rel = CstNodeRelationship::new(RelationshipKind::Declares, NodeId(1), NodeId(2));
        assert!(root.add_relationship(rel));
        assert!(!root.add_relationship(rel));
        assert_eq!(root.relationships_from(RelationshipKind::Declares, NodeId(1)).count(), 1);
        assert_eq!(root.relationships_from(RelationshipKind::Uses, NodeId(1)).count(), 0);
    }
}

//! Node matching between two snapshots.
//!
//! [`Matcher`] pairs before-nodes with after-nodes by textual similarity,
//! producing a [`MatchSet`] in which every node takes part in at most one
//! match. Unmatched before-nodes are reported as removed, unmatched
//! after-nodes as added.

mod matcher;
mod potential;

pub use matcher::{CompatibilityPredicate, Matcher};
pub use potential::{sort_by_priority, PotentialMatch};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MINIMUM_SIMILARITY, MAX_THRESHOLD, MIN_THRESHOLD};
use crate::cst::{CstNode, CstRoot, NodeId, NodeType};
use crate::error::{Error, Result};
use crate::similarity::IdfWeighting;

/// Built-in rules for which node types may be paired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    /// Only identical node types.
    #[default]
    SameType,
    /// Types of the same family, e.g. a method and a constructor.
    SameKind,
    /// Any two nodes.
    Any,
}

impl Compatibility {
    /// Returns true if a node of type `a` may be paired with one of type `b`.
    pub fn allows(self, a: NodeType, b: NodeType) -> bool {
        match self {
            Compatibility::SameType => a == b,
            Compatibility::SameKind => a.family() == b.family(),
            Compatibility::Any => true,
        }
    }
}

/// Matcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Candidates must score strictly above this value.
    pub minimum_similarity: f64,
    /// IDF formula used to weigh tokens.
    pub idf: IdfWeighting,
    /// Which node types may be paired.
    pub compatibility: Compatibility,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            minimum_similarity: DEFAULT_MINIMUM_SIMILARITY,
            idf: IdfWeighting::default(),
            compatibility: Compatibility::default(),
        }
    }
}

impl MatcherConfig {
    /// Creates a config with the given threshold and default policies.
    pub fn new(minimum_similarity: f64) -> Result<Self> {
        let config = MatcherConfig {
            minimum_similarity,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_idf(mut self, idf: IdfWeighting) -> Self {
        self.idf = idf;
        self
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Checks that the threshold lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&self.minimum_similarity) {
            return Err(Error::InvalidThreshold(self.minimum_similarity));
        }
        Ok(())
    }
}

/// An accepted pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeMatch {
    pub before: NodeId,
    pub after: NodeId,
    pub score: f64,
    /// True if the caller supplied the pair rather than the scorer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pinned: bool,
}

/// Counters for one matching run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Potential matches above the threshold.
    pub candidates: usize,
    /// Potential matches accepted.
    pub accepted: usize,
    /// Pinned pairs accepted.
    pub pinned: usize,
}

/// Result of a matching run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSet {
    /// Accepted matches in acceptance order.
    pub matches: Vec<NodeMatch>,
    /// Unmatched before-nodes, in traversal order.
    pub removed: Vec<NodeId>,
    /// Unmatched after-nodes, in traversal order.
    pub added: Vec<NodeId>,
    pub stats: MatchStats,
}

impl MatchSet {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The match a before-node takes part in.
    pub fn match_for_before(&self, id: NodeId) -> Option<&NodeMatch> {
        self.matches.iter().find(|m| m.before == id)
    }

    /// The match an after-node takes part in.
    pub fn match_for_after(&self, id: NodeId) -> Option<&NodeMatch> {
        self.matches.iter().find(|m| m.after == id)
    }

    /// Resolves a match back to the nodes of both snapshots.
    pub fn resolve<'a>(
        &self,
        node_match: &NodeMatch,
        before: &'a CstRoot,
        after: &'a CstRoot,
    ) -> Option<(&'a CstNode, &'a CstNode)> {
        Some((before.find(node_match.before)?, after.find(node_match.after)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility_rules() {
        assert!(Compatibility::SameType.allows(NodeType::Method, NodeType::Method));
        assert!(!Compatibility::SameType.allows(NodeType::Method, NodeType::Constructor));
        assert!(Compatibility::SameKind.allows(NodeType::Method, NodeType::Constructor));
        assert!(!Compatibility::SameKind.allows(NodeType::Method, NodeType::Field));
        assert!(Compatibility::Any.allows(NodeType::File, NodeType::Block));
    }

    #[test]
    fn test_config_validation() {
        assert!(MatcherConfig::new(0.0).is_ok());
        assert!(MatcherConfig::new(1.0).is_ok());
        assert!(matches!(MatcherConfig::new(1.5), Err(Error::InvalidThreshold(_))));
        assert!(matches!(MatcherConfig::new(-0.1), Err(Error::InvalidThreshold(_))));
        assert!(MatcherConfig::new(f64::NAN).is_err());
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: MatcherConfig = serde_json::from_str(r#"{"compatibility": "same_kind"}"#).unwrap();
        assert_eq!(config.minimum_similarity, DEFAULT_MINIMUM_SIMILARITY);
        assert_eq!(config.compatibility, Compatibility::SameKind);
        assert_eq!(config.idf, IdfWeighting::Smooth);
    }

    #[test]
    fn test_match_set_lookup() {
        let set = MatchSet {
            matches: vec![NodeMatch {
                before: NodeId(1),
                after: NodeId(10),
                score: 0.8,
                pinned: false,
            }],
            ..Default::default()
        };
        assert_eq!(set.match_for_before(NodeId(1)).map(|m| m.after), Some(NodeId(10)));
        assert_eq!(set.match_for_after(NodeId(10)).map(|m| m.before), Some(NodeId(1)));
        assert!(set.match_for_before(NodeId(10)).is_none());
        assert_eq!(set.len(), 1);
    }
}

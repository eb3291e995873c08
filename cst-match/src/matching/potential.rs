//! Scored candidate pairings.

use std::cmp::Ordering;
use std::fmt;

use crate::cst::CstNode;

/// An unconfirmed pairing of a before-node with an after-node.
#[derive(Debug, Clone, Copy)]
pub struct PotentialMatch<'a> {
    node_before: &'a CstNode,
    node_after: &'a CstNode,
    /// Larger of the two nodes' depths.
    max_depth: usize,
    score: f64,
}

impl<'a> PotentialMatch<'a> {
    pub fn new(node_before: &'a CstNode, node_after: &'a CstNode, max_depth: usize, score: f64) -> Self {
        PotentialMatch {
            node_before,
            node_after,
            max_depth,
            score,
        }
    }

    pub fn node_before(&self) -> &'a CstNode {
        self.node_before
    }

    pub fn node_after(&self) -> &'a CstNode {
        self.node_after
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Consumption priority: shallower first, then higher score.
    ///
    /// Candidates equal on both keys compare `Equal`; a stable sort keeps
    /// them in generation order.
    pub fn cmp_priority(&self, other: &PotentialMatch<'_>) -> Ordering {
        self.max_depth
            .cmp(&other.max_depth)
            .then_with(|| other.score.total_cmp(&self.score))
    }
}

impl fmt::Display for PotentialMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) depth={} score={:.3}",
            self.node_before, self.node_after, self.max_depth, self.score
        )
    }
}

/// Sorts candidates by [`PotentialMatch::cmp_priority`], keeping ties in
/// the order they were generated in.
pub fn sort_by_priority(candidates: &mut [PotentialMatch<'_>]) {
    candidates.sort_by(|a, b| a.cmp_priority(b));
}

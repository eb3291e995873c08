//! Greedy one-to-one matching of two snapshots.
//!
//! The matcher follows four steps:
//! 1. Build a representation for every node of both trees; a container's
//!    representation combines its own tokens with its descendants'
//! 2. Score every compatible (before, after) pair and keep those above the
//!    minimum similarity as potential matches
//! 3. Sort potential matches by depth, then score
//! 4. Accept each potential match whose nodes are both still free
//!
//! This approximates a maximum-weight bipartite matching. Resolving shallow
//! nodes first lets high-level matches settle before their descendants.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::potential::{sort_by_priority, PotentialMatch};
use super::{MatchSet, MatchStats, MatcherConfig, NodeMatch};
use crate::cst::{CstNode, CstRoot, NodeId, NodeType};
use crate::error::{Error, Result};
use crate::similarity::{Side, SourceRepresentationBuilder, TfIdfBuilder};

/// Predicate deciding whether two node types may ever be paired.
pub type CompatibilityPredicate = dyn Fn(NodeType, NodeType) -> bool;

/// Matches the nodes of a before-snapshot to those of an after-snapshot.
pub struct Matcher {
    config: MatcherConfig,
    predicate: Box<CompatibilityPredicate>,
}

impl Default for Matcher {
    fn default() -> Self {
        let config = MatcherConfig::default();
        let compatibility = config.compatibility;
        Matcher {
            config,
            predicate: Box::new(move |a, b| compatibility.allows(a, b)),
        }
    }
}

impl Matcher {
    /// Creates a matcher after validating `config`.
    pub fn new(config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        let compatibility = config.compatibility;
        Ok(Matcher {
            config,
            predicate: Box::new(move |a, b| compatibility.allows(a, b)),
        })
    }

    /// Replaces the configured compatibility rule with a custom predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(NodeType, NodeType) -> bool + 'static,
    {
        self.predicate = Box::new(predicate);
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Matches two snapshots with the TF-IDF policy.
    ///
    /// A fresh vocabulary is created for the run and dropped when it ends.
    /// Fails with [`Error::DuplicateNodeId`] when a snapshot reuses a node
    /// id, since matches are reported by id.
    pub fn match_trees(&self, before: &CstRoot, after: &CstRoot) -> Result<MatchSet> {
        self.match_trees_pinned(before, after, &[])
    }

    /// Matches two snapshots, accepting `pinned` pairs before any scored
    /// candidate.
    ///
    /// A pinned pair whose before- or after-node is already taken by an
    /// earlier pinned pair is skipped.
    pub fn match_trees_pinned(
        &self,
        before: &CstRoot,
        after: &CstRoot,
        pinned: &[(NodeId, NodeId)],
    ) -> Result<MatchSet> {
        let builder = TfIdfBuilder::new(self.config.idf);
        self.match_trees_with(&builder, before, after, pinned)
    }

    /// Matches two snapshots with a caller-supplied representation policy.
    ///
    /// The builder must not have seen either tree before: every node is
    /// registered with it exactly once here.
    pub fn match_trees_with<B: SourceRepresentationBuilder>(
        &self,
        builder: &B,
        before: &CstRoot,
        after: &CstRoot,
        pinned: &[(NodeId, NodeId)],
    ) -> Result<MatchSet> {
        before.check_unique_ids()?;
        after.check_unique_ids()?;
        check_pinned(before, after, pinned)?;
        let representations = self.build_all(builder, before, after);
        Ok(self.assign(builder, before, after, &representations, pinned))
    }

    /// Scores every compatible pair and returns the potential matches in
    /// consumption order.
    pub fn potential_matches<'a, B: SourceRepresentationBuilder>(
        &self,
        builder: &B,
        before: &'a CstRoot,
        after: &'a CstRoot,
    ) -> Result<Vec<PotentialMatch<'a>>> {
        before.check_unique_ids()?;
        after.check_unique_ids()?;
        let representations = self.build_all(builder, before, after);
        let free = Consumed::default();
        Ok(self.candidates(builder, before, after, &representations, &free))
    }

    fn build_all<B: SourceRepresentationBuilder>(
        &self,
        builder: &B,
        before: &CstRoot,
        after: &CstRoot,
    ) -> Representations<B::Representation> {
        let representations = Representations {
            before: build_representations(builder, before, Side::Before),
            after: build_representations(builder, after, Side::After),
        };
        debug!(
            before = representations.before.len(),
            after = representations.after.len(),
            "built node representations"
        );
        representations
    }

    fn candidates<'a, B: SourceRepresentationBuilder>(
        &self,
        builder: &B,
        before: &'a CstRoot,
        after: &'a CstRoot,
        representations: &Representations<B::Representation>,
        consumed: &Consumed,
    ) -> Vec<PotentialMatch<'a>> {
        let after_nodes: Vec<(&CstNode, usize)> = after
            .traverse()
            .filter(|(n, _)| !consumed.after.contains(&n.id()))
            .collect();

        let mut candidates = Vec::new();
        for (node_before, depth_before) in before.traverse() {
            if consumed.before.contains(&node_before.id()) {
                continue;
            }
            let repr_before = &representations.before[&node_before.id()];

            for &(node_after, depth_after) in &after_nodes {
                if !(self.predicate)(node_before.node_type(), node_after.node_type()) {
                    continue;
                }
                let repr_after = &representations.after[&node_after.id()];
                let score = builder.similarity(repr_before, repr_after);
                if score > self.config.minimum_similarity {
                    candidates.push(PotentialMatch::new(
                        node_before,
                        node_after,
                        depth_before.max(depth_after),
                        score,
                    ));
                }
            }
        }

        sort_by_priority(&mut candidates);
        candidates
    }

    fn assign<B: SourceRepresentationBuilder>(
        &self,
        builder: &B,
        before: &CstRoot,
        after: &CstRoot,
        representations: &Representations<B::Representation>,
        pinned: &[(NodeId, NodeId)],
    ) -> MatchSet {
        let mut consumed = Consumed::default();
        let mut matches = Vec::new();

        for &(id_before, id_after) in pinned {
            if consumed.before.contains(&id_before) || consumed.after.contains(&id_after) {
                trace!(before = %id_before, after = %id_after, "skipping pinned pair on a taken node");
                continue;
            }
            let score = builder.similarity(
                &representations.before[&id_before],
                &representations.after[&id_after],
            );
            consumed.take(id_before, id_after);
            matches.push(NodeMatch {
                before: id_before,
                after: id_after,
                score,
                pinned: true,
            });
        }
        let pinned_count = matches.len();

        let candidates = self.candidates(builder, before, after, representations, &consumed);
        let candidate_count = candidates.len();

        for candidate in &candidates {
            let id_before = candidate.node_before().id();
            let id_after = candidate.node_after().id();
            if consumed.before.contains(&id_before) || consumed.after.contains(&id_after) {
                trace!(%candidate, "rejected");
                continue;
            }
            trace!(%candidate, "accepted");
            consumed.take(id_before, id_after);
            matches.push(NodeMatch {
                before: id_before,
                after: id_after,
                score: candidate.score(),
                pinned: false,
            });
        }

        let removed: Vec<NodeId> = before
            .traverse()
            .map(|(n, _)| n.id())
            .filter(|id| !consumed.before.contains(id))
            .collect();
        let added: Vec<NodeId> = after
            .traverse()
            .map(|(n, _)| n.id())
            .filter(|id| !consumed.after.contains(id))
            .collect();

        let stats = MatchStats {
            candidates: candidate_count,
            accepted: matches.len() - pinned_count,
            pinned: pinned_count,
        };
        debug!(
            candidates = stats.candidates,
            accepted = stats.accepted,
            pinned = stats.pinned,
            removed = removed.len(),
            added = added.len(),
            "matching complete"
        );

        MatchSet {
            matches,
            removed,
            added,
            stats,
        }
    }
}

/// Per-node representations of both trees.
struct Representations<R> {
    before: FxHashMap<NodeId, R>,
    after: FxHashMap<NodeId, R>,
}

/// Nodes already taken by an accepted match.
#[derive(Default)]
struct Consumed {
    before: FxHashSet<NodeId>,
    after: FxHashSet<NodeId>,
}

impl Consumed {
    fn take(&mut self, before: NodeId, after: NodeId) {
        self.before.insert(before);
        self.after.insert(after);
    }
}

/// Builds the representation of every node of `root`.
///
/// Each node is registered once with its own tokens, then combined with
/// its children's representations.
fn build_representations<B: SourceRepresentationBuilder>(
    builder: &B,
    root: &CstRoot,
    side: Side,
) -> FxHashMap<NodeId, B::Representation> {
    let nodes: Vec<&CstNode> = root.traverse().map(|(n, _)| n).collect();
    let mut representations: FxHashMap<NodeId, B::Representation> =
        FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());

    // Reverse pre-order reaches every child before its parent
    for node in nodes.into_iter().rev() {
        let tokens = root.own_tokens(node);
        let mut repr = builder.build_for_node(node, side, &tokens);
        for child in node.children() {
            if let Some(child_repr) = representations.get(&child.id()) {
                repr = builder.combine(&repr, child_repr);
            }
        }
        representations.insert(node.id(), repr);
    }
    representations
}

fn check_pinned(before: &CstRoot, after: &CstRoot, pinned: &[(NodeId, NodeId)]) -> Result<()> {
    if pinned.is_empty() {
        return Ok(());
    }
    let before_ids: FxHashSet<NodeId> = before.traverse().map(|(n, _)| n.id()).collect();
    let after_ids: FxHashSet<NodeId> = after.traverse().map(|(n, _)| n.id()).collect();
    for (id_before, id_after) in pinned {
        if !before_ids.contains(id_before) {
            return Err(Error::UnknownNode(id_before.0));
        }
        if !after_ids.contains(id_after) {
            return Err(Error::UnknownNode(id_after.0));
        }
    }
    Ok(())
}

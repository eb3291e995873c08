//! Rendering of a match set for humans or machines.

use std::io::{self, Write};

use cst_match::{CstRoot, MatchSet, NodeId};
use rustc_hash::FxHashMap;

/// Writes one line per match, then the removed and added nodes.
pub fn write_text<W: Write>(
    out: &mut W,
    set: &MatchSet,
    before: &CstRoot,
    after: &CstRoot,
) -> io::Result<()> {
    let before_labels = Labels::new(before);
    let after_labels = Labels::new(after);

    for m in &set.matches {
        let marker = if m.pinned { " (pinned)" } else { "" };
        writeln!(
            out,
            "= {:.3}  {} -> {}{}",
            m.score,
            before_labels.get(m.before),
            after_labels.get(m.after),
            marker
        )?;
    }
    for &id in &set.removed {
        writeln!(out, "- {}", before_labels.get(id))?;
    }
    for &id in &set.added {
        writeln!(out, "+ {}", after_labels.get(id))?;
    }
    writeln!(
        out,
        "{} matched, {} removed, {} added ({} candidates)",
        set.len(),
        set.removed.len(),
        set.added.len(),
        set.stats.candidates
    )
}

/// Writes the match set as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, set: &MatchSet) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, set)?;
    writeln!(out)
}

/// `type path.to.node [file:line]` for every node of one snapshot.
struct Labels {
    labels: FxHashMap<NodeId, String>,
}

impl Labels {
    /// Labels all nodes in a single traversal.
    fn new(root: &CstRoot) -> Self {
        let mut labels = FxHashMap::default();
        let mut path: Vec<&str> = Vec::new();
        for (node, depth) in root.traverse() {
            path.truncate(depth);
            path.push(node.local_name());
            labels.insert(
                node.id(),
                format!("{} {} [{}]", node.node_type(), path.join("."), node.location()),
            );
        }
        Labels { labels }
    }

    fn get(&self, id: NodeId) -> String {
        self.labels
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

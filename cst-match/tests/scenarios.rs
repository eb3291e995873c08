//! End-to-end matching scenarios over small hand-built snapshots.

mod common;

use std::collections::HashSet;

use common::{methods, SnapshotBuilder};
use cst_match::{
    CstRoot, IdfWeighting, Matcher, MatcherConfig, NodeId, NodeType, Side,
    SourceRepresentationBuilder, TfIdfBuilder,
};

#[test]
fn renamed_method_is_matched() {
    let before = methods(1, &[&["calculate", "total", "tax"]]);
    let after = methods(100, &[&["compute", "total", "tax"]]);

    let set = Matcher::default().match_trees(&before, &after).unwrap();

    assert_eq!(set.len(), 1);
    let m = set.matches[0];
    assert_eq!((m.before, m.after), (NodeId(1), NodeId(100)));
    assert!(m.score > 0.0);
    assert!(set.removed.is_empty());
    assert!(set.added.is_empty());
}

#[test]
fn disjoint_content_is_not_matched() {
    let before = methods(1, &[&["a", "b", "c"]]);
    let after = methods(100, &[&["x", "y", "z"]]);

    let builder = TfIdfBuilder::default();
    let candidates = Matcher::default().potential_matches(&builder, &before, &after).unwrap();
    assert!(candidates.is_empty());

    let set = Matcher::default().match_trees(&before, &after).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.removed, vec![NodeId(1)]);
    assert_eq!(set.added, vec![NodeId(100)]);
}

#[test]
fn disjoint_content_has_zero_similarity() {
    let builder = TfIdfBuilder::default();
    let before = methods(1, &[&["a", "b", "c"]]);
    let after = methods(100, &[&["x", "y", "z"]]);
    let nb = &before.nodes()[0];
    let na = &after.nodes()[0];

    let rb = builder.build_for_node(nb, Side::Before, &before.own_tokens(nb));
    let ra = builder.build_for_node(na, Side::After, &after.own_tokens(na));
    assert_eq!(builder.similarity(&rb, &ra), 0.0);
}

#[test]
fn common_token_document_frequency() {
    let bodies: Vec<Vec<String>> = (0..10).map(|i| vec!["return".to_string(), format!("v{i}")]).collect();
    let refs: Vec<Vec<&str>> = bodies
        .iter()
        .map(|b| b.iter().map(String::as_str).collect())
        .collect();
    let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
    let root = methods(1, &slices);

    let builder = TfIdfBuilder::default();
    for (node, _) in root.traverse() {
        builder.build_for_node(node, Side::Before, &root.own_tokens(node));
    }

    let vocabulary = builder.vocabulary();
    assert_eq!(vocabulary.document_frequency(Side::Before, "return"), 10);
    assert_eq!(vocabulary.document_frequency(Side::Before, "v3"), 1);
    assert!(vocabulary.idf("return", Some(Side::Before)) < vocabulary.idf("v3", Some(Side::Before)));
}

#[test]
fn empty_before_tree_reports_everything_added() {
    let before = CstRoot::new();
    let after = methods(100, &[&["a"], &["b"], &["c"]]);

    let set = Matcher::default().match_trees(&before, &after).unwrap();
    assert!(set.is_empty());
    assert!(set.removed.is_empty());
    assert_eq!(set.added, vec![NodeId(100), NodeId(101), NodeId(102)]);
}

#[test]
fn empty_after_tree_reports_everything_removed() {
    let before = methods(1, &[&["a"], &["b"]]);
    let set = Matcher::default().match_trees(&before, &CstRoot::new()).unwrap();
    assert_eq!(set.removed, vec![NodeId(1), NodeId(2)]);
    assert!(set.added.is_empty());
}

#[test]
fn moved_method_follows_its_content() {
    // m2 moves from class A to class B
    let mut b = SnapshotBuilder::new();
    let m1 = b.leaf(2, NodeType::Method, "m1", &["open", "stream", "read", "bytes"]);
    let m2 = b.leaf(3, NodeType::Method, "m2", &["parse", "header", "checksum", "validate"]);
    let a = b.node(1, NodeType::Class, "A", &["class", "A"], vec![m1, m2]);
    let m3 = b.leaf(5, NodeType::Method, "m3", &["render", "template", "html"]);
    let class_b = b.node(4, NodeType::Class, "B", &["class", "B"], vec![m3]);
    let before = b.finish(vec![a, class_b]);

    let mut b = SnapshotBuilder::new();
    let m1 = b.leaf(12, NodeType::Method, "m1", &["open", "stream", "read", "bytes"]);
    let a = b.node(11, NodeType::Class, "A", &["class", "A"], vec![m1]);
    let m3 = b.leaf(15, NodeType::Method, "m3", &["render", "template", "html"]);
    let m2 = b.leaf(13, NodeType::Method, "m2", &["parse", "header", "checksum", "validate"]);
    let class_b = b.node(14, NodeType::Class, "B", &["class", "B"], vec![m3, m2]);
    let after = b.finish(vec![a, class_b]);

    let set = Matcher::default().match_trees(&before, &after).unwrap();
    let pairs: HashSet<(u32, u32)> = set.matches.iter().map(|m| (m.before.0, m.after.0)).collect();

    assert!(pairs.contains(&(2, 12)));
    assert!(pairs.contains(&(3, 13)));
    assert!(pairs.contains(&(5, 15)));
    assert_eq!(set.match_for_before(NodeId(3)).map(|m| m.after), Some(NodeId(13)));

    let m = set.match_for_before(NodeId(3)).unwrap();
    let (node_before, node_after) = set.resolve(m, &before, &after).unwrap();
    assert_eq!(before.node_path(node_before.id()), vec!["A", "m2"]);
    assert_eq!(after.node_path(node_after.id()), vec!["B", "m2"]);
}

#[test]
fn runs_are_deterministic() {
    let before = methods(1, &[&["a", "b", "c"], &["a", "b", "d"], &["e", "f"], &["a", "e", "f"]]);
    let after = methods(100, &[&["a", "b", "c", "x"], &["e", "f", "g"], &["a", "b", "d"]]);

    let config = MatcherConfig::new(0.3).unwrap();
    let first = Matcher::new(config).unwrap().match_trees(&before, &after).unwrap();
    let second = Matcher::new(config).unwrap().match_trees(&before, &after).unwrap();
    assert_eq!(first, second);
}

#[test]
fn vocabulary_does_not_leak_between_runs() {
    let before = methods(1, &[&["a", "b"]]);
    let after = methods(100, &[&["a", "b"]]);
    let matcher = Matcher::default();

    let first = matcher.match_trees(&before, &after).unwrap();
    let second = matcher.match_trees(&before, &after).unwrap();
    assert_eq!(first.matches[0].score, second.matches[0].score);
}

#[test]
fn logarithmic_weighting_also_matches_renames() {
    let before = methods(1, &[&["calculate", "total", "tax"], &["print", "receipt", "line"]]);
    let after = methods(100, &[&["compute", "total", "tax"], &["print", "receipt", "line"]]);

    let config = MatcherConfig::default().with_idf(IdfWeighting::Logarithmic);
    let set = Matcher::new(config).unwrap().match_trees(&before, &after).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.match_for_before(NodeId(1)).map(|m| m.after), Some(NodeId(100)));
    assert_eq!(set.match_for_before(NodeId(2)).map(|m| m.after), Some(NodeId(101)));
}

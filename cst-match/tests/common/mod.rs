//! Helpers for building snapshots in tests.

#![allow(dead_code)]

use cst_match::{CstNode, CstRoot, Location, NodeType, TokenizedSource};

pub const FILE: &str = "Main.java";

/// Builds the nodes of one file. Children must be created before their
/// parent so the parent's span encloses them.
pub struct SnapshotBuilder {
    source: TokenizedSource,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::for_file(FILE)
    }

    pub fn for_file(file: &str) -> Self {
        SnapshotBuilder {
            source: TokenizedSource::new(file),
        }
    }

    fn file(&self) -> String {
        self.source.file().to_string()
    }

    pub fn node(
        &mut self,
        id: u32,
        ty: NodeType,
        name: &str,
        tokens: &[&str],
        children: Vec<CstNode>,
    ) -> CstNode {
        let (own_begin, own_end) = self.source.push_tokens(tokens.iter().copied());
        let begin = children
            .first()
            .map_or(own_begin, |c| c.location().begin.min(own_begin));
        let location = Location::new(self.file(), begin, own_end, 1);
        let mut node = CstNode::new(id, ty, location).with_name(name);
        for child in children {
            node.add_child(child);
        }
        node
    }

    pub fn leaf(&mut self, id: u32, ty: NodeType, name: &str, tokens: &[&str]) -> CstNode {
        self.node(id, ty, name, tokens, Vec::new())
    }

    pub fn finish(self, nodes: Vec<CstNode>) -> CstRoot {
        let mut root = CstRoot::new();
        self.finish_into(&mut root, nodes);
        root
    }

    /// Adds this file's nodes and tokens to an existing snapshot.
    pub fn finish_into(self, root: &mut CstRoot, nodes: Vec<CstNode>) {
        for node in nodes {
            root.add_node(node);
        }
        root.add_tokenized_file(self.source);
    }
}

/// A class: its own tokens and one token list per method.
pub type ClassShape = (Vec<String>, Vec<Vec<String>>);

/// A snapshot with one file per entry of `files`, each holding classes with
/// methods. Ids run upward from `first_id` across all files.
pub fn nested(first_id: u32, files: &[Vec<ClassShape>]) -> CstRoot {
    let mut root = CstRoot::new();
    let mut next_id = first_id;
    for (f, classes) in files.iter().enumerate() {
        let mut builder = SnapshotBuilder::for_file(&format!("F{f}.java"));
        let mut nodes = Vec::new();
        for (own, methods) in classes {
            let children = methods
                .iter()
                .map(|tokens| {
                    next_id += 1;
                    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
                    builder.leaf(next_id, NodeType::Method, &format!("m{next_id}"), &tokens)
                })
                .collect();
            next_id += 1;
            let own: Vec<&str> = own.iter().map(String::as_str).collect();
            nodes.push(builder.node(next_id, NodeType::Class, &format!("C{next_id}"), &own, children));
        }
        builder.finish_into(&mut root, nodes);
    }
    root
}

/// A snapshot of top-level methods, one per token list, ids from `first_id`.
pub fn methods(first_id: u32, bodies: &[&[&str]]) -> CstRoot {
    let mut builder = SnapshotBuilder::new();
    let nodes = bodies
        .iter()
        .enumerate()
        .map(|(i, tokens)| {
            let id = first_id + i as u32;
            builder.leaf(id, NodeType::Method, &format!("m{id}"), tokens)
        })
        .collect();
    builder.finish(nodes)
}

//! cst-match - structural matching of source-tree snapshots
//!
//! This library pairs the nodes of two concrete structural trees (CSTs), one
//! per snapshot of a source tree, to find what survived a change, what was
//! removed and what was added. It is the matching core of a refactoring
//! detector: parsers build the trees, this crate computes the node
//! correspondence, and classifiers downstream read the result to name
//! renames, moves, extractions and the like.
//!
//! # Overview
//!
//! - [`cst`] models the trees: nodes, relationships and tokenized sources.
//! - [`similarity`] turns node content into TF-IDF weighted token bags
//!   against a per-run vocabulary and compares them.
//! - [`matching`] scores compatible node pairs and greedily accepts the
//!   best ones, shallow nodes first.
//!
//! # Example
//!
//! ```
//! use cst_match::{CstNode, CstRoot, Location, Matcher, NodeType, TokenizedSource};
//!
//! fn snapshot(id: u32, tokens: &[&str]) -> CstRoot {
//!     let mut source = TokenizedSource::new("Cart.java");
//!     let (begin, end) = source.push_tokens(tokens.iter().copied());
//!     let mut root = CstRoot::new();
//!     root.add_node(CstNode::new(id, NodeType::Method, Location::new("Cart.java", begin, end, 1)));
//!     root.add_tokenized_file(source);
//!     root
//! }
//!
//! let before = snapshot(1, &["calculate", "total", "tax"]);
//! let after = snapshot(2, &["compute", "total", "tax"]);
//!
//! let matches = Matcher::default().match_trees(&before, &after)?;
//! assert_eq!(matches.len(), 1);
//! # Ok::<(), cst_match::Error>(())
//! ```

pub mod constants;
pub mod cst;
pub mod error;
pub mod matching;
pub mod similarity;

pub use constants::*;
pub use cst::{
    CstNode, CstNodeRelationship, CstRoot, Location, NodeFamily, NodeId, NodeType,
    RelationshipKind, Token, TokenizedSource, Traversal,
};
pub use error::{Error, Result};
pub use matching::{
    Compatibility, CompatibilityPredicate, MatchSet, MatchStats, Matcher, MatcherConfig,
    NodeMatch, PotentialMatch,
};
pub use similarity::{
    IdfWeighting, Multiset, Side, SourceRepresentationBuilder, TfIdfBuilder,
    TfIdfSourceRepresentation, Vocabulary,
};

//! Error types for cst-match.

use thiserror::Error;

/// Result type alias for cst-match operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading snapshots or configuring the matcher.
///
/// Matching itself operates on validated in-memory trees and does not fail;
/// degenerate inputs resolve to empty match sets.
#[derive(Error, Debug)]
pub enum Error {
    /// Similarity threshold outside `[0, 1]`.
    #[error("Invalid similarity threshold: {0} (expected a value in [0, 1])")]
    InvalidThreshold(f64),

    /// Two nodes of one snapshot share an id.
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(u32),

    /// A node points at a file with no tokenized source.
    #[error("Node {node} references file '{file}' which has no tokenized source")]
    MissingTokenizedSource { node: u32, file: String },

    /// A node span is inverted.
    #[error("Node {node} has an invalid span {begin}..{end}")]
    InvalidSpan { node: u32, begin: usize, end: usize },

    /// A node id that does not exist in the snapshot.
    #[error("Unknown node id: {0}")]
    UnknownNode(u32),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

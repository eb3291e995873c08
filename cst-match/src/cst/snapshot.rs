//! JSON snapshots of a [`CstRoot`].
//!
//! Parsers running out of process hand their trees to the engine in this
//! form. Loading always validates the tree.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::CstRoot;
use crate::error::Result;

impl CstRoot {
    /// Parses and validates a snapshot from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: CstRoot = serde_json::from_str(json)?;
        root.validate()?;
        Ok(root)
    }

    /// Reads, parses and validates a snapshot file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let root = Self::from_json_str(&json)?;
        debug!(
            path = %path.display(),
            nodes = root.node_count(),
            files = root.tokenized_sources().len(),
            "loaded snapshot"
        );
        Ok(root)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

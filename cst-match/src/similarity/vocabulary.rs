//! Per-run document-frequency ledger.

use std::collections::HashSet;
use std::hash::BuildHasher;

use rustc_hash::FxHashMap;

use super::{IdfWeighting, Side};

/// Document frequencies of one side.
#[derive(Debug, Default, Clone)]
struct SideStats {
    /// Number of documents (nodes) registered.
    documents: usize,
    /// Token -> number of documents containing it.
    frequencies: FxHashMap<String, usize>,
}

/// Document frequencies of every token, split into the before and after
/// corpora.
///
/// A vocabulary lives for one matching run. Counters only ever grow.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    before: SideStats,
    after: SideStats,
    weighting: IdfWeighting,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(IdfWeighting::default())
    }
}

impl Vocabulary {
    /// Creates an empty vocabulary using the given IDF formula.
    pub fn new(weighting: IdfWeighting) -> Self {
        Vocabulary {
            before: SideStats::default(),
            after: SideStats::default(),
            weighting,
        }
    }

    pub fn weighting(&self) -> IdfWeighting {
        self.weighting
    }

    fn stats(&self, side: Side) -> &SideStats {
        match side {
            Side::Before => &self.before,
            Side::After => &self.after,
        }
    }

    /// Registers one document on `side`.
    ///
    /// Every token of the set has its document frequency raised by exactly
    /// one. Calling this twice for the same node counts it twice.
    pub fn count<S, H>(&mut self, side: Side, tokens: &HashSet<S, H>)
    where
        S: AsRef<str>,
        H: BuildHasher,
    {
        let stats = match side {
            Side::Before => &mut self.before,
            Side::After => &mut self.after,
        };
        stats.documents += 1;
        for token in tokens {
            let token: &str = token.as_ref();
            *stats.frequencies.entry(token.to_owned()).or_insert(0) += 1;
        }
    }

    /// Number of documents registered on `side`.
    pub fn documents(&self, side: Side) -> usize {
        self.stats(side).documents
    }

    /// Number of documents on `side` containing `token`.
    pub fn document_frequency(&self, side: Side, token: &str) -> usize {
        self.stats(side)
            .frequencies
            .get(token)
            .copied()
            .unwrap_or(0)
    }

    /// True if no document has been registered on either side.
    pub fn is_empty(&self) -> bool {
        self.before.documents == 0 && self.after.documents == 0
    }

    /// Inverse document frequency of `token`.
    ///
    /// With a side, only that side's corpus counts; without one (fragments),
    /// both corpora are pooled.
    pub fn idf(&self, token: &str, side: Option<Side>) -> f64 {
        let (documents, df) = match side {
            Some(side) => (self.documents(side), self.document_frequency(side, token)),
            None => (
                self.before.documents + self.after.documents,
                self.document_frequency(Side::Before, token)
                    + self.document_frequency(Side::After, token),
            ),
        };
        self.weighting.idf(documents, df)
    }
}

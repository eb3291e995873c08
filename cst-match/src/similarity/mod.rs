//! Textual similarity of CST nodes.
//!
//! Node content is modelled as a bag of tokens weighted by TF-IDF against a
//! per-run [`Vocabulary`]. The [`SourceRepresentationBuilder`] trait is the
//! policy seam the matcher works through; [`TfIdfBuilder`] is the standard
//! policy.

mod multiset;
mod representation;
mod tfidf;
mod vocabulary;

pub use multiset::Multiset;
pub use representation::TfIdfSourceRepresentation;
pub use tfidf::TfIdfBuilder;
pub use vocabulary::Vocabulary;

use serde::{Deserialize, Serialize};

use crate::cst::CstNode;

/// Which snapshot a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Before,
    After,
}

impl Side {
    pub fn from_is_before(is_before: bool) -> Self {
        if is_before {
            Side::Before
        } else {
            Side::After
        }
    }
}

/// Inverse document frequency formula.
///
/// `N` is the number of documents on the relevant side, `df` the number of
/// them containing the token. Both formulas are positive and decrease as
/// `df` grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdfWeighting {
    /// `ln((1 + N) / (1 + df)) + 1`
    #[default]
    Smooth,
    /// `ln(1 + N / df)`, with an unseen token weighted as if `df == 1`.
    Logarithmic,
}

impl IdfWeighting {
    /// Computes the weight for a token seen in `df` of `documents` documents.
    pub fn idf(self, documents: usize, df: usize) -> f64 {
        let n = documents as f64;
        match self {
            IdfWeighting::Smooth => ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0,
            IdfWeighting::Logarithmic => (1.0 + n / df.max(1) as f64).ln(),
        }
    }
}

/// Policy for building and comparing node representations.
///
/// `build_for_node` registers the node's distinct tokens in shared corpus
/// statistics and must be called exactly once per node; every other
/// operation is read-only.
pub trait SourceRepresentationBuilder {
    /// The representation type produced by this policy.
    type Representation: Clone;

    /// Builds the representation of a node from its token sequence.
    fn build_for_node(&self, node: &CstNode, side: Side, tokens: &[&str])
        -> Self::Representation;

    /// Builds a representation for free-standing text without touching the
    /// corpus statistics.
    fn build_for_fragment(&self, tokens: &[&str]) -> Self::Representation;

    /// Union of both representations, counts summed.
    fn combine(&self, a: &Self::Representation, b: &Self::Representation)
        -> Self::Representation;

    /// `a` with `b`'s counts subtracted, floored at zero.
    fn minus(&self, a: &Self::Representation, b: &Self::Representation) -> Self::Representation;

    /// `a` without any occurrence of `tokens`.
    fn minus_tokens(&self, a: &Self::Representation, tokens: &[&str]) -> Self::Representation;

    /// Symmetric similarity in `[0, 1]`.
    fn similarity(&self, a: &Self::Representation, b: &Self::Representation) -> f64;

    /// Share of `a` contained in `b`, in `[0, 1]`.
    fn partial_similarity(&self, a: &Self::Representation, b: &Self::Representation) -> f64;
}

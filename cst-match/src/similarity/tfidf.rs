//! The TF-IDF representation policy.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::trace;

use super::{
    IdfWeighting, Multiset, Side, SourceRepresentationBuilder, TfIdfSourceRepresentation,
    Vocabulary,
};
use crate::cst::CstNode;

/// Builds [`TfIdfSourceRepresentation`]s against a vocabulary it owns.
///
/// One builder serves one matching run. Dropping it drops the vocabulary,
/// after which its representations can no longer be compared.
#[derive(Debug)]
pub struct TfIdfBuilder {
    vocabulary: Rc<RefCell<Vocabulary>>,
}

impl Default for TfIdfBuilder {
    fn default() -> Self {
        Self::new(IdfWeighting::default())
    }
}

impl TfIdfBuilder {
    /// Creates a builder with a fresh, empty vocabulary.
    pub fn new(weighting: IdfWeighting) -> Self {
        TfIdfBuilder {
            vocabulary: Rc::new(RefCell::new(Vocabulary::new(weighting))),
        }
    }

    /// Read access to the corpus statistics.
    pub fn vocabulary(&self) -> Ref<'_, Vocabulary> {
        self.vocabulary.borrow()
    }

    fn multiset(tokens: &[&str]) -> Multiset<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }
}

impl SourceRepresentationBuilder for TfIdfBuilder {
    type Representation = TfIdfSourceRepresentation;

    fn build_for_node(
        &self,
        node: &CstNode,
        side: Side,
        tokens: &[&str],
    ) -> TfIdfSourceRepresentation {
        let multiset = Self::multiset(tokens);
        self.vocabulary
            .borrow_mut()
            .count(side, &multiset.as_set());
        trace!(
            node = %node.id(),
            ?side,
            tokens = multiset.len(),
            distinct = multiset.distinct_len(),
            "registered node tokens"
        );
        TfIdfSourceRepresentation::new(multiset, Some(side), Rc::downgrade(&self.vocabulary))
    }

    fn build_for_fragment(&self, tokens: &[&str]) -> TfIdfSourceRepresentation {
        TfIdfSourceRepresentation::new(
            Self::multiset(tokens),
            None,
            Rc::downgrade(&self.vocabulary),
        )
    }

    fn combine(
        &self,
        a: &TfIdfSourceRepresentation,
        b: &TfIdfSourceRepresentation,
    ) -> TfIdfSourceRepresentation {
        a.combine(b)
    }

    fn minus(
        &self,
        a: &TfIdfSourceRepresentation,
        b: &TfIdfSourceRepresentation,
    ) -> TfIdfSourceRepresentation {
        a.minus(b)
    }

    fn minus_tokens(&self, a: &TfIdfSourceRepresentation, tokens: &[&str]) -> TfIdfSourceRepresentation {
        a.minus_tokens(tokens)
    }

    fn similarity(&self, a: &TfIdfSourceRepresentation, b: &TfIdfSourceRepresentation) -> f64 {
        a.similarity(b)
    }

    fn partial_similarity(
        &self,
        a: &TfIdfSourceRepresentation,
        b: &TfIdfSourceRepresentation,
    ) -> f64 {
        a.partial_similarity(b)
    }
}

//! TF-IDF weighted token bags.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use super::{Multiset, Side, Vocabulary};
use crate::constants::ZERO_SIMILARITY;

/// The content of a node (or text fragment) as a token multiset bound to
/// the vocabulary that weighs it.
///
/// The vocabulary is held weakly: a representation never keeps a run's
/// statistics alive. Representations are only comparable with others bound
/// to the same vocabulary.
#[derive(Debug, Clone)]
pub struct TfIdfSourceRepresentation {
    tokens: Multiset<String>,
    /// Corpus the weights are taken from; None pools both sides.
    side: Option<Side>,
    vocabulary: Weak<RefCell<Vocabulary>>,
}

impl TfIdfSourceRepresentation {
    pub(crate) fn new(
        tokens: Multiset<String>,
        side: Option<Side>,
        vocabulary: Weak<RefCell<Vocabulary>>,
    ) -> Self {
        TfIdfSourceRepresentation {
            tokens,
            side,
            vocabulary,
        }
    }

    pub fn tokens(&self) -> &Multiset<String> {
        &self.tokens
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True if both representations are bound to the same vocabulary.
    pub fn shares_vocabulary(&self, other: &TfIdfSourceRepresentation) -> bool {
        Weak::ptr_eq(&self.vocabulary, &other.vocabulary)
    }

    fn check_same_vocabulary(&self, other: &TfIdfSourceRepresentation) {
        if !self.shares_vocabulary(other) {
            panic!("ASSERT FAILED: representations are bound to different vocabularies");
        }
    }

    fn vocabulary(&self) -> Rc<RefCell<Vocabulary>> {
        match self.vocabulary.upgrade() {
            Some(vocabulary) => vocabulary,
            None => panic!("ASSERT FAILED: vocabulary dropped while its representations are in use"),
        }
    }

    fn merged_side(&self, other: &TfIdfSourceRepresentation) -> Option<Side> {
        if self.side == other.side {
            self.side
        } else {
            None
        }
    }

    /// Union of both bags, counts summed.
    pub fn combine(&self, other: &TfIdfSourceRepresentation) -> TfIdfSourceRepresentation {
        self.check_same_vocabulary(other);
        TfIdfSourceRepresentation::new(
            self.tokens.plus(&other.tokens),
            self.merged_side(other),
            self.vocabulary.clone(),
        )
    }

    /// This bag with `other`'s counts removed, floored at zero per token.
    pub fn minus(&self, other: &TfIdfSourceRepresentation) -> TfIdfSourceRepresentation {
        self.check_same_vocabulary(other);
        TfIdfSourceRepresentation::new(
            self.tokens.minus(&other.tokens),
            self.side,
            self.vocabulary.clone(),
        )
    }

    /// This bag without any occurrence of `tokens`.
    pub fn minus_tokens(&self, tokens: &[&str]) -> TfIdfSourceRepresentation {
        TfIdfSourceRepresentation::new(
            self.tokens.minus_elements(tokens.iter().copied()),
            self.side,
            self.vocabulary.clone(),
        )
    }

    /// Weighted vector: `count * idf` per token.
    fn weights(&self, vocabulary: &Vocabulary) -> FxHashMap<&str, f64> {
        self.tokens
            .iter()
            .map(|(token, count)| {
                let weight = count as f64 * vocabulary.idf(token, self.side);
                (token.as_str(), weight)
            })
            .collect()
    }

    /// Cosine similarity of the TF-IDF vectors, in `[0, 1]`.
    ///
    /// Empty bags and an empty vocabulary give 0.0.
    ///
    /// # Panics
    ///
    /// If the representations are bound to different vocabularies, or the
    /// vocabulary has been dropped.
    pub fn similarity(&self, other: &TfIdfSourceRepresentation) -> f64 {
        self.check_same_vocabulary(other);
        if self.is_empty() || other.is_empty() {
            return ZERO_SIMILARITY;
        }

        let vocabulary = self.vocabulary();
        let vocabulary = vocabulary.borrow();
        if vocabulary.is_empty() {
            return ZERO_SIMILARITY;
        }

        let a = self.weights(&vocabulary);
        let b = other.weights(&vocabulary);

        let dot: f64 = a
            .iter()
            .filter_map(|(token, wa)| b.get(token).map(|wb| wa * wb))
            .sum();
        let norm_a: f64 = a.values().map(|w| w * w).sum();
        let norm_b: f64 = b.values().map(|w| w * w).sum();

        if norm_a == 0.0 || norm_b == 0.0 {
            return ZERO_SIMILARITY;
        }
        (dot / (norm_a * norm_b).sqrt()).clamp(0.0, 1.0)
    }

    /// Fraction of this representation's weight also present in `other`.
    ///
    /// Normalized by this side only, so a small fragment fully contained in
    /// a large node scores 1.0.
    ///
    /// # Panics
    ///
    /// Same conditions as [`similarity`](Self::similarity).
    pub fn partial_similarity(&self, other: &TfIdfSourceRepresentation) -> f64 {
        self.check_same_vocabulary(other);
        if self.is_empty() || other.is_empty() {
            return ZERO_SIMILARITY;
        }

        let vocabulary = self.vocabulary();
        let vocabulary = vocabulary.borrow();
        if vocabulary.is_empty() {
            return ZERO_SIMILARITY;
        }

        let a = self.weights(&vocabulary);
        let b = other.weights(&vocabulary);

        let total: f64 = a.values().sum();
        if total == 0.0 {
            return ZERO_SIMILARITY;
        }
        let shared: f64 = a
            .iter()
            .map(|(token, wa)| b.get(token).map_or(0.0, |wb| wa.min(*wb)))
            .sum();
        (shared / total).clamp(0.0, 1.0)
    }
}

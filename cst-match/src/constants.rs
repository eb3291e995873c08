//! Constants used throughout cst-match.
//!
//! These are the engine defaults; every one of them can be overridden through
//! [`MatcherConfig`](crate::matching::MatcherConfig).

/// Default minimum similarity. Candidates must score strictly above this.
pub const DEFAULT_MINIMUM_SIMILARITY: f64 = 0.5;

/// Lowest accepted similarity threshold.
pub const MIN_THRESHOLD: f64 = 0.0;

/// Highest accepted similarity threshold.
pub const MAX_THRESHOLD: f64 = 1.0;

/// Similarity reported for degenerate comparisons (empty or zero-weight vectors).
pub const ZERO_SIMILARITY: f64 = 0.0;

/// Offset gap between consecutive tokens appended with
/// [`TokenizedSource::push_tokens`](crate::cst::TokenizedSource::push_tokens).
pub const TOKEN_SEPARATOR_WIDTH: usize = 1;

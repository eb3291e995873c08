//! Counting container for tokens.

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

/// A bag of items with per-item occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiset<T: Eq + Hash> {
    counts: FxHashMap<T, usize>,
    /// Total number of occurrences.
    len: usize,
}

impl<T: Eq + Hash> Default for Multiset<T> {
    fn default() -> Self {
        Multiset {
            counts: FxHashMap::default(),
            len: 0,
        }
    }
}

impl<T: Eq + Hash + Clone> Multiset<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `item`.
    pub fn add(&mut self, item: T) {
        self.add_n(item, 1);
    }

    /// Adds `n` occurrences of `item`.
    pub fn add_n(&mut self, item: T, n: usize) {
        if n == 0 {
            return;
        }
        *self.counts.entry(item).or_insert(0) += n;
        self.len += n;
    }

    /// Accumulates counts from a sequence of items.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.add(item);
        }
    }

    /// Number of occurrences of `item`.
    pub fn multiplicity<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.contains_key(item)
    }

    /// Total number of occurrences.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of distinct items.
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct items, duplicates removed.
    pub fn as_set(&self) -> FxHashSet<&T> {
        self.counts.keys().collect()
    }

    /// Iterates `(item, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    /// Sum of both multisets.
    pub fn plus(&self, other: &Multiset<T>) -> Multiset<T> {
        let mut result = self.clone();
        for (item, count) in other.iter() {
            result.add_n(item.clone(), count);
        }
        result
    }

    /// Per-item difference, floored at zero.
    pub fn minus(&self, other: &Multiset<T>) -> Multiset<T> {
        if other.is_empty() {
            return self.clone();
        }
        let mut result = Multiset::new();
        for (item, count) in self.iter() {
            let remaining = count.saturating_sub(other.multiplicity(item));
            result.add_n(item.clone(), remaining);
        }
        result
    }

    /// Drops every occurrence of the listed items.
    pub fn minus_elements<'a, Q, I>(&self, items: I) -> Multiset<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let ignored: FxHashSet<&Q> = items.into_iter().collect();
        let mut result = Multiset::new();
        for (item, count) in self.iter() {
            let key: &Q = Borrow::<Q>::borrow(item);
            if !ignored.contains(&key) {
                result.add_n(item.clone(), count);
            }
        }
        result
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut multiset = Multiset::new();
        multiset.add_all(iter);
        multiset
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for Multiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

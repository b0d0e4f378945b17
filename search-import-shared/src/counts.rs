//! Per-index record counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of records written, keyed by destination index name.
///
/// Backed by a `BTreeMap` so iteration and formatting are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexCounts(BTreeMap<String, usize>);

impl IndexCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts for a single index.
    pub fn single(index: impl Into<String>, count: usize) -> Self {
        let mut counts = Self::new();
        counts.add(index, count);
        counts
    }

    /// Add `count` records to `index`.
    pub fn add(&mut self, index: impl Into<String>, count: usize) {
        *self.0.entry(index.into()).or_insert(0) += count;
    }

    /// Fold another set of counts into this one.
    pub fn merge(&mut self, other: &IndexCounts) {
        for (index, count) in &other.0 {
            self.add(index.clone(), *count);
        }
    }

    /// A copy with the records of `from` attributed to `to`.
    pub fn renamed(&self, from: &str, to: &str) -> IndexCounts {
        self.iter()
            .map(|(index, count)| (if index == from { to } else { index }, count))
            .collect()
    }

    pub fn get(&self, index: &str) -> Option<usize> {
        self.0.get(index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over all indices.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(index, count)| (index.as_str(), *count))
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for IndexCounts {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (index, count) in iter {
            counts.add(index, count);
        }
        counts
    }
}

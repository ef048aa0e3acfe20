//! The authoritative mapping from file path to line counts.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use super::stats::LineCounts;

/// Insertion-ordered map from a report path to its [`LineCounts`].
///
/// Iteration follows the order in which paths were first inserted, which is
/// the order rows appear in the producer's report. That order drives both
/// the shape of the hierarchy and the occurrence indices baked into ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathIndex {
    entries: Vec<(String, LineCounts)>,
    positions: HashMap<String, usize>,
}

impl PathIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert counts for a path.
    ///
    /// Re-inserting a known path replaces its counts but keeps its original
    /// position. Returns the previous counts, if any.
    pub fn insert(&mut self, path: impl Into<String>, counts: LineCounts) -> Option<LineCounts> {
        let path = path.into();
        if let Some(&pos) = self.positions.get(&path) {
            let previous = std::mem::replace(&mut self.entries[pos].1, counts);
            return Some(previous);
        }
        self.positions.insert(path.clone(), self.entries.len());
        self.entries.push((path, counts));
        None
    }

    /// Counts for an exact path.
    pub fn get(&self, path: &str) -> Option<LineCounts> {
        self.positions.get(path).map(|&pos| self.entries[pos].1)
    }

    /// Whether the index has an entry for `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.positions.contains_key(path)
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths and counts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, LineCounts)> {
        self.entries.iter().map(|(path, counts)| (path.as_str(), *counts))
    }

    /// Element-wise sum over every entry.
    pub fn total(&self) -> LineCounts {
        self.entries.iter().map(|(_, counts)| counts).sum()
    }
}

impl<P: Into<String>> FromIterator<(P, LineCounts)> for PathIndex {
    fn from_iter<I: IntoIterator<Item = (P, LineCounts)>>(iter: I) -> Self {
        let mut index = PathIndex::new();
        for (path, counts) in iter {
            index.insert(path, counts);
        }
        index
    }
}

impl Serialize for PathIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(path, counts)| (path, counts)))
    }
}

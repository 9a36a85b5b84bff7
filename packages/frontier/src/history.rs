//! The done side of the frontier: the visited-link history.
//!
//! An append-only set of links that have been submitted for parsing. Under
//! the default visit policy a link enters here the moment it is claimed,
//! before its parse outcome is known; that is what makes processing
//! at-most-once. [`VisitedHistory::forget`] exists so a caller can layer a
//! retry policy on top, which the engine itself deliberately does not do.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::Link;

/// Set of links already submitted for processing.
#[derive(Debug, Default)]
pub struct VisitedHistory {
    visited: HashSet<Link>,
}

/// Serializable logical content of a [`VisitedHistory`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Visited `(kind, id)` pairs; order carries no meaning.
    pub visited: Vec<Link>,
}

impl VisitedHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record links as visited. Idempotent.
    pub fn put(&mut self, links: impl IntoIterator<Item = Link>) {
        self.visited.extend(links);
    }

    /// O(1) membership test.
    pub fn contains(&self, link: &Link) -> bool {
        self.visited.contains(link)
    }

    /// Remove one link so a later run will process it again.
    ///
    /// Returns whether the link was present.
    pub fn forget(&mut self, link: &Link) -> bool {
        self.visited.remove(link)
    }

    /// Number of visited links.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// True when nothing has been visited.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Drop the whole history.
    pub fn reset(&mut self) {
        self.visited.clear();
    }

    /// Capture the logical content for checkpointing.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            visited: self.visited.iter().cloned().collect(),
        }
    }

    /// Rebuild a history from a snapshot.
    pub fn from_snapshot(snapshot: HistorySnapshot) -> Self {
        Self {
            visited: snapshot.visited.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_contains() {
        let mut history = VisitedHistory::new();
        history.put([Link::category("/a")]);
        assert!(history.contains(&Link::category("/a")));
        assert!(!history.contains(&Link::product("/a")));
    }

    #[test]
    fn test_put_is_idempotent() {
        let mut history = VisitedHistory::new();
        history.put([Link::category("/a"), Link::category("/a")]);
        history.put([Link::category("/a")]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_forget() {
        let mut history = VisitedHistory::new();
        history.put([Link::product("/p1")]);
        assert!(history.forget(&Link::product("/p1")));
        assert!(!history.forget(&Link::product("/p1")));
        assert!(!history.contains(&Link::product("/p1")));
    }

    #[test]
    fn test_reset() {
        let mut history = VisitedHistory::new();
        history.put([Link::category("/a"), Link::product("/p")]);
        history.reset();
        assert!(history.is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut history = VisitedHistory::new();
        history.put([Link::category("/a"), Link::product("/p1")]);

        let json = serde_json::to_string(&history.snapshot()).unwrap();
        let snapshot: HistorySnapshot = serde_json::from_str(&json).unwrap();
        let restored = VisitedHistory::from_snapshot(snapshot);

        assert_eq!(restored.len(), 2);
        assert!(restored.contains(&Link::category("/a")));
        assert!(restored.contains(&Link::product("/p1")));
    }
}

//! The combined frontier: pending queue plus visited history.
//!
//! [`CrawlFrontier`] is the unit the walker locks. Keeping both structures
//! behind one handle makes the check-then-insert on discovery a single
//! operation ([`CrawlFrontier::offer`]), which is the critical section the
//! concurrency model needs: two workers discovering the same product link
//! must not both pass the membership checks and double-enqueue it.
//!
//! Invariant: a link is never in the queue and the history at the same
//! time. "Known" links partition into pending (queue) and done (history).

use serde::{Deserialize, Serialize};

use crate::history::{HistorySnapshot, VisitedHistory};
use crate::queue::{FrontierQueue, QueueSnapshot};
use crate::types::{Link, LinkKind};

/// Queue and history of one traversal, mutated together.
#[derive(Debug, Default)]
pub struct CrawlFrontier {
    queue: FrontierQueue,
    history: VisitedHistory,
}

/// Serializable checkpoint of a whole frontier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontierSnapshot {
    /// Pending links, per kind, in pop order.
    pub queue: QueueSnapshot,
    /// Visited links.
    pub history: HistorySnapshot,
}

impl CrawlFrontier {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a discovered link unless it is already pending or visited.
    ///
    /// This is the atomic check-then-insert: callers must not probe
    /// membership separately and then insert.
    pub fn offer(&mut self, link: Link) -> bool {
        if self.history.contains(&link) || self.queue.contains(&link) {
            return false;
        }
        self.queue.put([link]) == 1
    }

    /// Offer many links; returns how many were newly enqueued.
    pub fn offer_all(&mut self, links: impl IntoIterator<Item = Link>) -> usize {
        links.into_iter().filter(|link| self.offer(link.clone())).count()
    }

    /// Pop up to `count` links across `kinds` (in the given preference
    /// order), recording them as visited in the same step when
    /// `mark_visited` is set.
    pub fn claim(&mut self, count: usize, kinds: &[LinkKind], mark_visited: bool) -> Vec<Link> {
        let batch = self.queue.pop_any_of(count, kinds);
        if mark_visited {
            self.history.put(batch.iter().cloned());
        }
        batch
    }

    /// Record links as visited (for the visited-on-success policy).
    pub fn mark_visited(&mut self, links: &[Link]) {
        self.history.put(links.iter().cloned());
    }

    /// Remove links from history so a later run retries them.
    pub fn forget(&mut self, links: &[Link]) -> usize {
        links
            .iter()
            .filter(|link| self.history.forget(link))
            .count()
    }

    /// True when the queue has pending links of `kind` (or any kind).
    pub fn queue_has(&self, kind: Option<LinkKind>) -> bool {
        self.queue.has(kind)
    }

    /// True when the queue has pending links of any of `kinds`.
    pub fn queue_has_any_of(&self, kinds: &[LinkKind]) -> bool {
        self.queue.has_any_of(kinds)
    }

    /// Queue membership test.
    pub fn queue_contains(&self, link: &Link) -> bool {
        self.queue.contains(link)
    }

    /// History membership test.
    pub fn history_contains(&self, link: &Link) -> bool {
        self.history.contains(link)
    }

    /// Total pending links.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pending links of one kind.
    pub fn pending_of(&self, kind: LinkKind) -> usize {
        self.queue.len_of(kind)
    }

    /// Total visited links.
    pub fn visited(&self) -> usize {
        self.history.len()
    }

    /// True when both structures are empty (nothing known yet).
    pub fn is_blank(&self) -> bool {
        self.queue.is_empty() && self.history.is_empty()
    }

    /// Clear queue and history.
    pub fn reset(&mut self) {
        self.queue.reset();
        self.history.reset();
    }

    /// Capture both structures for checkpointing.
    pub fn snapshot(&self) -> FrontierSnapshot {
        FrontierSnapshot {
            queue: self.queue.snapshot(),
            history: self.history.snapshot(),
        }
    }

    /// Replace the frontier content with a checkpoint.
    pub fn restore(&mut self, snapshot: FrontierSnapshot) {
        self.queue = FrontierQueue::from_snapshot(snapshot.queue);
        self.history = VisitedHistory::from_snapshot(snapshot.history);
    }

    #[cfg(debug_assertions)]
    pub(crate) fn assert_partitioned(&self) {
        self.queue.assert_consistent();
        let snapshot = self.queue.snapshot();
        for (_, links) in &snapshot.pending {
            for link in links {
                debug_assert!(
                    !self.history.contains(link),
                    "link {link} present in both queue and history"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_rejects_pending_duplicates() {
        let mut frontier = CrawlFrontier::new();
        assert!(frontier.offer(Link::product("/p1")));
        assert!(!frontier.offer(Link::product("/p1")));
        assert_eq!(frontier.pending(), 1);
    }

    #[test]
    fn test_offer_rejects_visited_links() {
        let mut frontier = CrawlFrontier::new();
        frontier.mark_visited(&[Link::product("/p1")]);
        assert!(!frontier.offer(Link::product("/p1")));
        assert_eq!(frontier.pending(), 0);
        frontier.assert_partitioned();
    }

    #[test]
    fn test_claim_marks_visited_in_one_step() {
        let mut frontier = CrawlFrontier::new();
        frontier.offer_all([Link::category("/a"), Link::category("/b")]);

        let batch = frontier.claim(1, &[LinkKind::Category], true);
        assert_eq!(batch, [Link::category("/a")]);
        assert!(frontier.history_contains(&Link::category("/a")));
        assert!(!frontier.queue_contains(&Link::category("/a")));
        frontier.assert_partitioned();

        // A claimed link cannot come back through discovery.
        assert!(!frontier.offer(Link::category("/a")));
    }

    #[test]
    fn test_claim_without_marking() {
        let mut frontier = CrawlFrontier::new();
        frontier.offer(Link::product("/p1"));

        let batch = frontier.claim(1, &[LinkKind::Product], false);
        assert_eq!(batch.len(), 1);
        assert!(!frontier.history_contains(&Link::product("/p1")));
    }

    #[test]
    fn test_forget_enables_reoffer() {
        let mut frontier = CrawlFrontier::new();
        frontier.offer(Link::product("/p1"));
        frontier.claim(1, &[LinkKind::Product], true);

        assert_eq!(frontier.forget(&[Link::product("/p1")]), 1);
        assert!(frontier.offer(Link::product("/p1")));
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut frontier = CrawlFrontier::new();
        frontier.offer_all([Link::category("/a"), Link::product("/p1")]);
        frontier.claim(1, &[LinkKind::Category], true);

        let snapshot = frontier.snapshot();
        let mut restored = CrawlFrontier::new();
        restored.restore(snapshot);

        assert_eq!(restored.pending(), 1);
        assert_eq!(restored.visited(), 1);
        assert!(restored.queue_contains(&Link::product("/p1")));
        assert!(restored.history_contains(&Link::category("/a")));
        restored.assert_partitioned();
    }

    #[test]
    fn test_is_blank() {
        let mut frontier = CrawlFrontier::new();
        assert!(frontier.is_blank());
        frontier.offer(Link::category("/a"));
        assert!(!frontier.is_blank());
        frontier.claim(1, &[LinkKind::Category], true);
        // Visited history keeps the frontier non-blank.
        assert!(!frontier.is_blank());
        frontier.reset();
        assert!(frontier.is_blank());
    }
}

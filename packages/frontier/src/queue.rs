//! The pending side of the frontier: per-kind deduplicated FIFO queues.
//!
//! Each link kind gets its own deque plus a membership set; the two always
//! hold exactly the same elements. FIFO order holds within a kind; across
//! kinds, untyped pops drain in [`LinkKind::ALL`] order so the result is
//! deterministic without promising anything stronger.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::{Link, LinkKind};

#[derive(Debug, Default)]
struct KindLane {
    order: VecDeque<Link>,
    members: HashSet<Link>,
}

impl KindLane {
    fn push(&mut self, link: Link) -> bool {
        if self.members.contains(&link) {
            return false;
        }
        self.members.insert(link.clone());
        self.order.push_back(link);
        true
    }

    fn pop(&mut self) -> Option<Link> {
        let link = self.order.pop_front()?;
        self.members.remove(&link);
        Some(link)
    }
}

/// Deduplicated FIFO of pending links, partitioned by kind.
#[derive(Debug, Default)]
pub struct FrontierQueue {
    lanes: HashMap<LinkKind, KindLane>,
}

/// Serializable logical content of a [`FrontierQueue`]: per-kind ordered
/// link sequences. Round-trips order and membership exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Pending links per kind, in pop order.
    pub pending: Vec<(LinkKind, Vec<Link>)>,
}

impl FrontierQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue links, silently skipping any already pending under the same
    /// kind. Returns how many were actually added.
    pub fn put(&mut self, links: impl IntoIterator<Item = Link>) -> usize {
        let mut added = 0;
        for link in links {
            if self.lanes.entry(link.kind).or_default().push(link) {
                added += 1;
            }
        }
        added
    }

    /// True when the given kind (or, with `None`, any kind) has pending
    /// links.
    pub fn has(&self, kind: Option<LinkKind>) -> bool {
        match kind {
            Some(kind) => self
                .lanes
                .get(&kind)
                .is_some_and(|lane| !lane.order.is_empty()),
            None => self.lanes.values().any(|lane| !lane.order.is_empty()),
        }
    }

    /// True when any of the given kinds has pending links.
    pub fn has_any_of(&self, kinds: &[LinkKind]) -> bool {
        kinds.iter().any(|kind| self.has(Some(*kind)))
    }

    /// Remove and return up to `count` links.
    ///
    /// With a kind, pops only that lane in FIFO order. Without one, drains
    /// lanes in [`LinkKind::ALL`] order until `count` is satisfied or
    /// everything is exhausted. Never blocks; returns fewer (possibly zero)
    /// links when the queue runs dry.
    pub fn pop(&mut self, count: usize, kind: Option<LinkKind>) -> Vec<Link> {
        let mut result = Vec::new();
        let kinds: &[LinkKind] = match kind {
            Some(ref k) => std::slice::from_ref(k),
            None => &LinkKind::ALL,
        };
        for kind in kinds {
            if let Some(lane) = self.lanes.get_mut(kind) {
                while result.len() < count {
                    match lane.pop() {
                        Some(link) => result.push(link),
                        None => break,
                    }
                }
            }
            if result.len() >= count {
                break;
            }
        }
        result
    }

    /// Pop up to `count` links from the first of `kinds` that has any,
    /// continuing through the rest in the given order.
    pub fn pop_any_of(&mut self, count: usize, kinds: &[LinkKind]) -> Vec<Link> {
        let mut result = Vec::new();
        for kind in kinds {
            if result.len() >= count {
                break;
            }
            result.extend(self.pop(count - result.len(), Some(*kind)));
        }
        result
    }

    /// O(1) membership test on the `(kind, id)` dedup key.
    pub fn contains(&self, link: &Link) -> bool {
        self.lanes
            .get(&link.kind)
            .is_some_and(|lane| lane.members.contains(link))
    }

    /// Pending links of one kind.
    pub fn len_of(&self, kind: LinkKind) -> usize {
        self.lanes.get(&kind).map_or(0, |lane| lane.order.len())
    }

    /// Total pending links across kinds.
    pub fn len(&self) -> usize {
        self.lanes.values().map(|lane| lane.order.len()).sum()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all pending links.
    pub fn reset(&mut self) {
        self.lanes.clear();
    }

    /// Capture the logical content for checkpointing.
    pub fn snapshot(&self) -> QueueSnapshot {
        let mut pending = Vec::new();
        for kind in LinkKind::ALL {
            if let Some(lane) = self.lanes.get(&kind) {
                if !lane.order.is_empty() {
                    pending.push((kind, lane.order.iter().cloned().collect()));
                }
            }
        }
        QueueSnapshot { pending }
    }

    /// Rebuild a queue from a snapshot, preserving per-kind order.
    pub fn from_snapshot(snapshot: QueueSnapshot) -> Self {
        let mut queue = Self::new();
        for (_, links) in snapshot.pending {
            queue.put(links);
        }
        queue
    }

    #[cfg(debug_assertions)]
    pub(crate) fn assert_consistent(&self) {
        for lane in self.lanes.values() {
            debug_assert_eq!(lane.order.len(), lane.members.len());
        }
    }
}

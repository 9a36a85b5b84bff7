//! In-memory checkpoint store for testing and development.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::frontier::FrontierSnapshot;
use crate::traits::store::StateStore;

/// In-memory [`StateStore`].
///
/// Useful for tests and single-process runs. Checkpoints are lost on
/// restart, so it gives resumability within a process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Option<FrontierSnapshot>>,
    saves: RwLock<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a checkpoint is held.
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.read().unwrap().is_some()
    }

    /// Number of `save` calls, for test assertions.
    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn save(&self, snapshot: &FrontierSnapshot) -> StoreResult<()> {
        *self.snapshot.write().unwrap() = Some(snapshot.clone());
        *self.saves.write().unwrap() += 1;
        Ok(())
    }

    async fn load(&self) -> StoreResult<Option<FrontierSnapshot>> {
        Ok(self.snapshot.read().unwrap().clone())
    }

    async fn clear(&self) -> StoreResult<()> {
        *self.snapshot.write().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::CrawlFrontier;
    use crate::types::Link;

    #[tokio::test]
    async fn test_save_load_clear() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        let mut frontier = CrawlFrontier::new();
        frontier.offer(Link::category("/a"));
        store.save(&frontier.snapshot()).await.unwrap();

        assert!(store.has_snapshot());
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, frontier.snapshot());

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_previous() {
        let store = MemoryStore::new();
        let mut frontier = CrawlFrontier::new();

        frontier.offer(Link::category("/a"));
        store.save(&frontier.snapshot()).await.unwrap();

        frontier.offer(Link::product("/p1"));
        store.save(&frontier.snapshot()).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.queue.pending.len(), 2);
        assert_eq!(store.save_count(), 2);
    }
}

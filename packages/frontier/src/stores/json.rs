//! JSON file checkpoint store.
//!
//! Serializes the frontier snapshot to a single JSON file. The format is
//! an implementation detail, not a contract; only the logical content
//! (per-kind order plus membership) is promised to round-trip.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::frontier::FrontierSnapshot;
use crate::traits::store::StateStore;

/// [`StateStore`] backed by one JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing to `path`. Parent directories must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The checkpoint file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn save(&self, snapshot: &FrontierSnapshot) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        // Write-then-rename so an interrupted save never clobbers the
        // previous checkpoint.
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(StoreError::storage)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(StoreError::storage)?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "checkpoint saved");
        Ok(())
    }

    async fn load(&self) -> StoreResult<Option<FrontierSnapshot>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::storage(err)),
        };
        let snapshot = serde_json::from_slice(&bytes)?;
        Ok(Some(snapshot))
    }

    async fn clear(&self) -> StoreResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::storage(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::CrawlFrontier;
    use crate::types::{Link, LinkKind};

    fn temp_store(name: &str) -> JsonFileStore {
        let mut path = std::env::temp_dir();
        path.push(format!("frontier-{}-{}.json", name, std::process::id()));
        JsonFileStore::new(path)
    }

    #[tokio::test]
    async fn test_load_when_absent_is_none() {
        let store = temp_store("absent");
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order() {
        let store = temp_store("round-trip");
        store.clear().await.unwrap();

        let mut frontier = CrawlFrontier::new();
        frontier.offer_all([
            Link::category("/b"),
            Link::category("/a"),
            Link::product("/p1"),
        ]);
        frontier.claim(1, &[LinkKind::Category], true);
        store.save(&frontier.snapshot()).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, frontier.snapshot());

        let mut restored = CrawlFrontier::new();
        restored.restore(loaded);
        assert!(restored.history_contains(&Link::category("/b")));
        assert_eq!(
            restored.claim(1, &[LinkKind::Category], false),
            [Link::category("/a")]
        );

        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = temp_store("clear");
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }
}

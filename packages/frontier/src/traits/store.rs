//! Persistence port for frontier checkpoints.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::frontier::FrontierSnapshot;

/// Durable storage for frontier checkpoints.
///
/// The engine defines only the logical shape that must round-trip (the
/// [`FrontierSnapshot`]); any serialization that preserves per-kind order
/// and membership is conformant.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Persist a checkpoint, replacing any previous one.
    async fn save(&self, snapshot: &FrontierSnapshot) -> StoreResult<()>;

    /// Load the latest checkpoint, or `None` when none was ever saved.
    async fn load(&self) -> StoreResult<Option<FrontierSnapshot>>;

    /// Drop any stored checkpoint.
    async fn clear(&self) -> StoreResult<()>;
}

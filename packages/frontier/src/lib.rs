//! Resumable, deduplicating site-traversal engine.
//!
//! The engine walks a site in two phases: expand category pages to
//! discover products and pagination, then harvest product pages with a
//! bounded pool of concurrent fetches. All site knowledge lives behind
//! the [`SiteStrategy`] trait; the engine owns the frontier (per-kind
//! queue plus visited history), checkpointing, and cancellation.
//!
//! # Example
//!
//! ```no_run
//! use frontier::{MemoryStore, NullSink, ScriptedStrategy, WalkConfig, Walker};
//!
//! # async fn run() -> Result<(), frontier::WalkError> {
//! let strategy = ScriptedStrategy::new();
//! let walker = Walker::new(strategy, NullSink, MemoryStore::new())
//!     .with_config(WalkConfig::default().with_product_workers(8));
//! let report = walker.walk(false).await?;
//! tracing::info!(products = report.products_parsed, "done");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod frontier;
pub mod history;
pub mod queue;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod walker;

pub use error::{SetupError, SetupResult, StoreError, StoreResult, WalkError, WalkResult};
pub use frontier::{CrawlFrontier, FrontierSnapshot};
pub use history::{HistorySnapshot, VisitedHistory};
pub use queue::{FrontierQueue, QueueSnapshot};
pub use stores::{JsonFileStore, MemoryStore};
pub use testing::{ScriptedStrategy, VecSink};
pub use traits::{NullSink, ParseBatch, RecordSink, SiteStrategy, StateStore};
pub use types::{
    field_set, Field, FieldRecord, FieldSet, FieldValue, Link, LinkKind, VisitPolicy, WalkConfig,
};
pub use walker::{WalkReport, Walker};

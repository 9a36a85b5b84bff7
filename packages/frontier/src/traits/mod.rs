//! Trait boundaries consumed by the traversal engine.

pub mod sink;
pub mod store;
pub mod strategy;

pub use sink::{NullSink, RecordSink};
pub use store::StateStore;
pub use strategy::{ParseBatch, SiteStrategy};

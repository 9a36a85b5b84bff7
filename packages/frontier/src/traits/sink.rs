//! Output boundary for harvested records.

use async_trait::async_trait;

use crate::error::WalkResult;
use crate::types::{FieldRecord, Link};

/// Receiver for harvested product records.
///
/// What happens to a record (database row, CSV line, message queue) is the
/// caller's concern; the walker only publishes.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Accept one harvested record.
    async fn publish(&self, link: &Link, record: &FieldRecord) -> WalkResult<()>;
}

/// Sink that discards everything (for runs that only exercise traversal).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl RecordSink for NullSink {
    async fn publish(&self, _link: &Link, _record: &FieldRecord) -> WalkResult<()> {
        Ok(())
    }
}

//! Walk configuration.

use serde::{Deserialize, Serialize};

use crate::types::field::{field_set, Field, FieldSet};

/// When a claimed link is recorded in the visited history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisitPolicy {
    /// Mark visited when the link is popped for parsing, before the result
    /// is known. Guarantees at-most-once processing; a transiently failed
    /// link is not retried until the caller forgets it from history.
    #[default]
    OnAttempt,
    /// Mark visited only when the strategy returned a record for the link.
    /// Failed links stay out of history and are retried on the next run.
    OnSuccess,
}

/// Configuration for a traversal run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Category links claimed per `parse_categories` call.
    pub category_batch: usize,

    /// Product links claimed per `parse_products` call.
    pub product_batch: usize,

    /// Concurrent `parse_products` calls during harvesting.
    ///
    /// Category expansion stays sequential: its results feed back into the
    /// frontier and FIFO discovery order is worth keeping there.
    pub product_workers: usize,

    /// Pause between category batches in milliseconds (polite pacing).
    pub batch_delay_ms: u64,

    /// Checkpoint the frontier to the state store every N batches.
    ///
    /// 0 disables periodic checkpoints; the walker still saves at phase
    /// transitions and at the end of the run.
    pub checkpoint_every: usize,

    /// When claimed links enter the visited history.
    pub visit_policy: VisitPolicy,

    /// Record harvested product links in history as well.
    ///
    /// Not required for correctness (products are never re-enqueued within
    /// a run) but keeps restarts symmetric.
    pub record_products_in_history: bool,

    /// Fields requested for category pages.
    pub category_fields: FieldSet,

    /// Fields requested for product stubs discovered on category pages.
    pub category_product_fields: FieldSet,

    /// Fields requested for product pages.
    pub product_fields: FieldSet,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            category_batch: 1,
            product_batch: 10,
            product_workers: 4,
            batch_delay_ms: 0,
            checkpoint_every: 10,
            visit_policy: VisitPolicy::OnAttempt,
            record_products_in_history: true,
            category_fields: field_set([
                Field::ParsedAt,
                Field::ParsedUrl,
                Field::Name,
                Field::Pages,
                Field::Products,
            ]),
            category_product_fields: field_set([Field::Url]),
            product_fields: field_set([
                Field::ParsedAt,
                Field::ParsedUrl,
                Field::Url,
                Field::Name,
                Field::Price,
            ]),
        }
    }
}

impl WalkConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category batch size.
    pub fn with_category_batch(mut self, batch: usize) -> Self {
        self.category_batch = batch.max(1);
        self
    }

    /// Set the product batch size.
    pub fn with_product_batch(mut self, batch: usize) -> Self {
        self.product_batch = batch.max(1);
        self
    }

    /// Set the number of concurrent product workers.
    pub fn with_product_workers(mut self, workers: usize) -> Self {
        self.product_workers = workers.max(1);
        self
    }

    /// Set the inter-batch delay.
    pub fn with_batch_delay_ms(mut self, ms: u64) -> Self {
        self.batch_delay_ms = ms;
        self
    }

    /// Set the periodic checkpoint interval (0 = phase edges only).
    pub fn with_checkpoint_every(mut self, batches: usize) -> Self {
        self.checkpoint_every = batches;
        self
    }

    /// Set the visit policy.
    pub fn with_visit_policy(mut self, policy: VisitPolicy) -> Self {
        self.visit_policy = policy;
        self
    }

    /// Set the category field set.
    pub fn with_category_fields(mut self, fields: FieldSet) -> Self {
        self.category_fields = fields;
        self
    }

    /// Set the product field set.
    pub fn with_product_fields(mut self, fields: FieldSet) -> Self {
        self.product_fields = fields;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps_zero_sizes() {
        let config = WalkConfig::new()
            .with_category_batch(0)
            .with_product_batch(0)
            .with_product_workers(0);

        assert_eq!(config.category_batch, 1);
        assert_eq!(config.product_batch, 1);
        assert_eq!(config.product_workers, 1);
    }

    #[test]
    fn test_default_requests_discovery_fields() {
        let config = WalkConfig::default();
        assert!(config.category_fields.contains(&Field::Pages));
        assert!(config.category_fields.contains(&Field::Products));
        assert_eq!(config.visit_policy, VisitPolicy::OnAttempt);
    }
}

//! Testing utilities: a scripted site and a collecting sink.
//!
//! Useful for exercising traversal logic without any site code or network
//! access. The scripted strategy records every link submitted for parsing
//! so tests can assert at-most-once processing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::{SetupError, SetupResult, WalkResult};
use crate::traits::{ParseBatch, RecordSink, SiteStrategy};
use crate::types::{Field, FieldRecord, FieldSet, FieldValue, Link};

/// A deterministic, in-memory [`SiteStrategy`].
///
/// Configure seeds, category records, and product records up front;
/// anything not configured (or marked failing) behaves like a fetch
/// failure and is omitted from parse results, per the strategy contract.
#[derive(Default)]
pub struct ScriptedStrategy {
    base_url: String,
    seeds: RwLock<Vec<Link>>,
    seed_failure: RwLock<bool>,
    categories: RwLock<HashMap<Link, FieldRecord>>,
    products: RwLock<HashMap<Link, FieldRecord>>,
    failing: RwLock<HashSet<Link>>,
    submitted: RwLock<Vec<Link>>,
    last_status: RwLock<Option<u16>>,
}

impl ScriptedStrategy {
    /// Create an empty scripted site.
    pub fn new() -> Self {
        Self {
            base_url: "https://site.test".into(),
            ..Default::default()
        }
    }

    /// Set the seed links returned by `build_initial_list`.
    pub fn with_seeds(self, seeds: impl IntoIterator<Item = Link>) -> Self {
        *self.seeds.write().unwrap() = seeds.into_iter().collect();
        self
    }

    /// Make `build_initial_list` fail.
    pub fn with_seed_failure(self) -> Self {
        *self.seed_failure.write().unwrap() = true;
        self
    }

    /// Script a category page by id.
    pub fn with_category(self, id: impl Into<String>, record: FieldRecord) -> Self {
        self.categories
            .write()
            .unwrap()
            .insert(Link::category(id), record);
        self
    }

    /// Script a product page by id.
    pub fn with_product(self, id: impl Into<String>, record: FieldRecord) -> Self {
        self.set_product(id, record);
        self
    }

    /// Mark a link as failing to fetch.
    pub fn with_failing(self, link: Link) -> Self {
        self.failing.write().unwrap().insert(link);
        self
    }

    /// Script (or re-script) a product page after construction.
    pub fn set_product(&self, id: impl Into<String>, record: FieldRecord) {
        self.products
            .write()
            .unwrap()
            .insert(Link::product(id), record);
    }

    /// Clear a previously configured failure.
    pub fn unfail(&self, link: &Link) {
        self.failing.write().unwrap().remove(link);
    }

    /// Every link submitted for parsing, in submission order.
    pub fn submitted_links(&self) -> Vec<Link> {
        self.submitted.read().unwrap().clone()
    }

    /// Forget the submission log.
    pub fn clear_log(&self) {
        self.submitted.write().unwrap().clear();
    }

    /// Project a scripted record onto the requested field set and fill in
    /// the bookkeeping fields, so the result carries exactly the
    /// requested keys.
    fn project(&self, link: &Link, scripted: &FieldRecord, fields: &FieldSet) -> FieldRecord {
        let mut record = FieldRecord::for_fields(fields);
        for (field, value) in scripted.iter() {
            if fields.contains(&field) {
                record.set(field, value.clone());
            }
        }
        if fields.contains(&Field::ParsedAt) {
            record.set(Field::ParsedAt, FieldValue::Timestamp(Utc::now()));
        }
        if fields.contains(&Field::ParsedUrl) {
            record.set(Field::ParsedUrl, FieldValue::Text(self.resolve(link)));
        }
        record
    }

    fn parse_from(
        &self,
        table: &RwLock<HashMap<Link, FieldRecord>>,
        links: &[Link],
        fields: &FieldSet,
    ) -> ParseBatch {
        let mut batch = ParseBatch::new();
        for link in links {
            self.submitted.write().unwrap().push(link.clone());
            if self.failing.read().unwrap().contains(link) {
                *self.last_status.write().unwrap() = Some(500);
                continue;
            }
            let Some(scripted) = table.read().unwrap().get(link).cloned() else {
                *self.last_status.write().unwrap() = Some(404);
                continue;
            };
            *self.last_status.write().unwrap() = Some(200);
            batch.insert(link.clone(), self.project(link, &scripted, fields));
        }
        batch
    }
}

#[async_trait]
impl SiteStrategy for ScriptedStrategy {
    async fn build_initial_list(&self) -> SetupResult<Vec<Link>> {
        if *self.seed_failure.read().unwrap() {
            return Err(SetupError::RootFetch {
                url: self.base_url.clone(),
                status: Some(503),
            });
        }
        Ok(self.seeds.read().unwrap().clone())
    }

    async fn parse_categories(
        &self,
        links: &[Link],
        fields: &FieldSet,
        _product_fields: Option<&FieldSet>,
    ) -> ParseBatch {
        self.parse_from(&self.categories, links, fields)
    }

    async fn parse_products(&self, links: &[Link], fields: &FieldSet) -> ParseBatch {
        self.parse_from(&self.products, links, fields)
    }

    fn resolve(&self, link: &Link) -> String {
        match url::Url::parse(&link.id) {
            Ok(absolute) => absolute.to_string(),
            Err(_) => format!("{}{}", self.base_url, link.id),
        }
    }

    fn last_status(&self) -> Option<u16> {
        *self.last_status.read().unwrap()
    }
}

/// Sink that collects published records in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    records: RwLock<Vec<(Link, FieldRecord)>>,
}

impl VecSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far.
    pub fn records(&self) -> Vec<(Link, FieldRecord)> {
        self.records.read().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for VecSink {
    async fn publish(&self, link: &Link, record: &FieldRecord) -> WalkResult<()> {
        self.records
            .write()
            .unwrap()
            .push((link.clone(), record.clone()));
        Ok(())
    }
}

/// Build a category record carrying discovered pagination and product ids.
pub fn category_record(pages: &[&str], products: &[&str]) -> FieldRecord {
    FieldRecord::default()
        .with(Field::Name, FieldValue::Text("category".into()))
        .with(
            Field::Pages,
            FieldValue::List(pages.iter().map(|s| s.to_string()).collect()),
        )
        .with(
            Field::Products,
            FieldValue::List(products.iter().map(|s| s.to_string()).collect()),
        )
}

/// Build a minimal product record.
pub fn product_record(name: &str, price: f64) -> FieldRecord {
    FieldRecord::default()
        .with(Field::Name, FieldValue::Text(name.into()))
        .with(Field::Price, FieldValue::Number(price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::field_set;

    #[tokio::test]
    async fn test_parse_result_keys_match_request_exactly() {
        let strategy = ScriptedStrategy::new().with_product("/p1", product_record("P1", 9.5));
        let fields = field_set([Field::Name, Field::Sku, Field::ParsedUrl]);

        let batch = strategy
            .parse_products(&[Link::product("/p1")], &fields)
            .await;
        let record = &batch[&Link::product("/p1")];

        // Scripted price is dropped (not requested); sku is present and
        // empty (requested, never extracted).
        assert_eq!(record.fields(), fields);
        assert!(record.get(Field::Sku).unwrap().is_empty());
        assert_eq!(
            record.get(Field::ParsedUrl).unwrap().as_text(),
            Some("https://site.test/p1")
        );
    }

    #[tokio::test]
    async fn test_failing_links_are_omitted_not_null() {
        let strategy = ScriptedStrategy::new()
            .with_product("/p1", product_record("P1", 1.0))
            .with_failing(Link::product("/p2"));
        let fields = field_set([Field::Name]);

        let batch = strategy
            .parse_products(&[Link::product("/p1"), Link::product("/p2")], &fields)
            .await;

        assert_eq!(batch.len(), 1);
        assert!(batch.contains_key(&Link::product("/p1")));
        assert!(!batch.contains_key(&Link::product("/p2")));
    }

    #[tokio::test]
    async fn test_parse_product_single_variant() {
        let strategy = ScriptedStrategy::new().with_product("/p1", product_record("P1", 1.0));
        let fields = field_set([Field::Name]);

        let record = strategy.parse_product(&Link::product("/p1"), &fields).await;
        assert!(record.is_some());

        let missing = strategy.parse_product(&Link::product("/p9"), &fields).await;
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_last_status_tracks_most_recent_fetch() {
        let strategy = ScriptedStrategy::new()
            .with_product("/p1", product_record("P1", 1.0))
            .with_failing(Link::product("/p2"));
        let fields = field_set([Field::Name]);

        assert_eq!(strategy.last_status(), None);
        strategy
            .parse_products(&[Link::product("/p1")], &fields)
            .await;
        assert_eq!(strategy.last_status(), Some(200));
        strategy
            .parse_products(&[Link::product("/p2")], &fields)
            .await;
        assert_eq!(strategy.last_status(), Some(500));
    }

    #[test]
    fn test_resolve_is_identity_for_absolute_urls() {
        let strategy = ScriptedStrategy::new();
        assert_eq!(
            strategy.resolve(&Link::product("https://other.test/p")),
            "https://other.test/p"
        );
        assert_eq!(
            strategy.resolve(&Link::product("/catalog/p")),
            "https://site.test/catalog/p"
        );
    }
}

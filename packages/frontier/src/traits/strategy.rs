//! Site strategy trait: the fetch/extraction boundary.
//!
//! One implementation per target site. The engine never touches HTTP, DOM,
//! or selectors itself; it hands batches of links to the strategy and
//! consumes the returned records. Strategies must not mutate the frontier:
//! every enqueue and history write happens in the walker, which keeps the
//! dedup logic in one place and testable without any site code.

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::SetupResult;
use crate::types::{FieldRecord, FieldSet, Link};

/// Parse results for a batch of links.
///
/// Links that failed to fetch or extract are simply absent; absence is the
/// failure signal, never a null entry. Records that are present contain a
/// value for every requested field.
pub type ParseBatch = IndexMap<Link, FieldRecord>;

/// Per-site fetch and extraction capability.
///
/// The batch parse operations must not fail on recoverable conditions
/// (network errors, missing DOM elements): they log, degrade to empty
/// field values or omitted entries, and return what they have. Only
/// [`SiteStrategy::build_initial_list`] may report an error, and only for
/// failures that make the whole run pointless.
#[async_trait]
pub trait SiteStrategy: Send + Sync {
    /// Fetch the root page and return the seed links for the traversal.
    ///
    /// The walker enqueues the result; a failed call therefore leaves the
    /// frontier exactly as it was.
    async fn build_initial_list(&self) -> SetupResult<Vec<Link>>;

    /// Fetch and extract a batch of category pages.
    ///
    /// When `product_fields` is given, each record should also carry the
    /// discovered pagination ids under `Field::Pages` and product ids
    /// under `Field::Products`.
    async fn parse_categories(
        &self,
        links: &[Link],
        fields: &FieldSet,
        product_fields: Option<&FieldSet>,
    ) -> ParseBatch;

    /// Fetch and extract a batch of product pages.
    async fn parse_products(&self, links: &[Link], fields: &FieldSet) -> ParseBatch;

    /// Fetch and extract a single product page.
    ///
    /// Default: delegates to [`SiteStrategy::parse_products`].
    async fn parse_product(&self, link: &Link, fields: &FieldSet) -> Option<FieldRecord> {
        let mut batch = self
            .parse_products(std::slice::from_ref(link), fields)
            .await;
        batch.swap_remove(link)
    }

    /// Map a link's opaque id to a fetchable address.
    ///
    /// Identity for ids that are already absolute URLs.
    fn resolve(&self, link: &Link) -> String;

    /// HTTP status of the most recent fetch, when one happened.
    fn last_status(&self) -> Option<u16>;
}

//! The traversal controller.
//!
//! Drives the two-phase walk over a site: expand categories (discovering
//! pagination and product links, feeding them back into the frontier),
//! then harvest products and publish the records to the sink. All frontier
//! mutation happens here, under one mutex, so the dedup and partition
//! invariants hold no matter how many product workers run.

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::WalkResult;
use crate::frontier::{CrawlFrontier, FrontierSnapshot};
use crate::traits::{RecordSink, SiteStrategy, StateStore};
use crate::types::{Field, Link, LinkKind, VisitPolicy, WalkConfig};

/// Kinds drained during category expansion. Pagination links are enqueued
/// as `Category`; `CategoryPage` is accepted so externally seeded frontiers
/// traverse the same way.
const EXPAND_KINDS: [LinkKind; 2] = [LinkKind::Category, LinkKind::CategoryPage];

/// Outcome of one traversal run.
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    /// Seed links enqueued during this run.
    pub seeded: usize,

    /// Category pages that returned a record.
    pub categories_parsed: usize,

    /// Product pages that returned a record (and were published).
    pub products_parsed: usize,

    /// Product links newly discovered and enqueued.
    pub discovered_products: usize,

    /// Pagination links newly discovered and enqueued.
    pub discovered_pages: usize,

    /// Links claimed for parsing that yielded no record.
    ///
    /// Under the default visit policy these stay in history and will not
    /// be retried until the caller forgets them.
    pub failed: Vec<Link>,

    /// The run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl WalkReport {
    /// True when the run reached the end without cancellation or
    /// per-link failures.
    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.failed.is_empty()
    }
}

/// Resumable site traversal controller.
///
/// Owns the frontier for the duration of a run; the strategy only returns
/// parse results and never touches queue or history.
pub struct Walker<S, K, P> {
    strategy: Arc<S>,
    sink: Arc<K>,
    store: P,
    frontier: Arc<Mutex<CrawlFrontier>>,
    config: WalkConfig,
    cancel: CancellationToken,
}

impl<S, K, P> Walker<S, K, P>
where
    S: SiteStrategy,
    K: RecordSink,
    P: StateStore,
{
    /// Create a walker with the default configuration.
    pub fn new(strategy: S, sink: K, store: P) -> Self {
        Self {
            strategy: Arc::new(strategy),
            sink: Arc::new(sink),
            store,
            frontier: Arc::new(Mutex::new(CrawlFrontier::new())),
            config: WalkConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: WalkConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The token that cancels this walker between (and during) batches.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn lock(&self) -> MutexGuard<'_, CrawlFrontier> {
        self.frontier.lock().unwrap()
    }

    /// Perform a full traversal.
    ///
    /// With `reset` the frontier is cleared and reseeded; without it, a
    /// blank frontier is seeded and a non-blank one resumes where the
    /// last run stopped. Completing a walk and calling it again without
    /// `reset` is a no-op: the queue is empty and the history keeps every
    /// processed link out.
    pub async fn walk(&self, reset: bool) -> WalkResult<WalkReport> {
        let mut report = WalkReport::default();

        if reset {
            info!("resetting frontier");
            self.lock().reset();
        }

        if self.lock().is_blank() {
            let seeded = self.seed(&mut report).await?;
            self.checkpoint().await?;
            if !seeded {
                return Ok(report);
            }
        }

        if !report.cancelled {
            self.expand_categories(&mut report).await?;
        }
        if !report.cancelled {
            self.harvest_products(&mut report).await?;
        }

        self.checkpoint().await?;

        let frontier = self.lock();
        info!(
            categories = report.categories_parsed,
            products = report.products_parsed,
            failed = report.failed.len(),
            visited = frontier.visited(),
            pending = frontier.pending(),
            cancelled = report.cancelled,
            "walk finished"
        );
        Ok(report)
    }

    /// Persist the current frontier through the state store.
    pub async fn save(&self) -> WalkResult<()> {
        self.checkpoint().await
    }

    /// Load the last checkpoint, replacing the in-memory frontier.
    ///
    /// Returns whether a checkpoint existed.
    pub async fn restore(&self) -> WalkResult<bool> {
        match self.store.load().await? {
            Some(snapshot) => {
                self.lock().restore(snapshot);
                let frontier = self.lock();
                info!(
                    pending = frontier.pending(),
                    visited = frontier.visited(),
                    "frontier restored from checkpoint"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// True when links of `kind` (or any kind) are pending.
    pub fn queue_has(&self, kind: Option<LinkKind>) -> bool {
        self.lock().queue_has(kind)
    }

    /// True when the link has been submitted for parsing.
    pub fn history_contains(&self, link: &Link) -> bool {
        self.lock().history_contains(link)
    }

    /// Total pending links.
    pub fn pending(&self) -> usize {
        self.lock().pending()
    }

    /// Total visited links.
    pub fn visited(&self) -> usize {
        self.lock().visited()
    }

    /// Remove links from history so the next run retries them (when they
    /// are rediscovered or re-seeded). Returns how many were present.
    pub fn forget(&self, links: &[Link]) -> usize {
        self.lock().forget(links)
    }

    /// A snapshot of the current frontier content.
    pub fn frontier_snapshot(&self) -> FrontierSnapshot {
        self.lock().snapshot()
    }

    async fn checkpoint(&self) -> WalkResult<()> {
        let snapshot = self.lock().snapshot();
        self.store.save(&snapshot).await?;
        Ok(())
    }

    /// Seed the frontier from the strategy's initial list.
    ///
    /// Returns `false` when the run should stop (cancelled). A setup
    /// failure propagates and, because the seeds are only enqueued after a
    /// successful call, leaves queue and history untouched.
    async fn seed(&self, report: &mut WalkReport) -> WalkResult<bool> {
        let seeds = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                report.cancelled = true;
                return Ok(false);
            }
            result = self.strategy.build_initial_list() => result?,
        };

        report.seeded = self.lock().offer_all(seeds);
        info!(seeded = report.seeded, "frontier seeded");
        Ok(true)
    }

    /// Phase two: drain category links, feeding discoveries back in.
    ///
    /// Runs sequentially: discovery order feeds the frontier, and keeping
    /// it FIFO makes "oldest pending first" hold for the whole phase.
    async fn expand_categories(&self, report: &mut WalkReport) -> WalkResult<()> {
        let mark_on_claim = self.config.visit_policy == VisitPolicy::OnAttempt;
        let mut batches = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let batch =
                self.lock()
                    .claim(self.config.category_batch, &EXPAND_KINDS, mark_on_claim);
            if batch.is_empty() {
                break;
            }
            debug!(batch = batch.len(), "parsing category batch");

            let parsed = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    // Already claimed links count as processed with
                    // unknown outcome; they are not re-queued.
                    report.cancelled = true;
                    break;
                }
                parsed = self.strategy.parse_categories(
                    &batch,
                    &self.config.category_fields,
                    Some(&self.config.category_product_fields),
                ) => parsed,
            };

            {
                let mut frontier = self.lock();
                if self.config.visit_policy == VisitPolicy::OnSuccess {
                    let succeeded: Vec<Link> = batch
                        .iter()
                        .filter(|link| parsed.contains_key(*link))
                        .cloned()
                        .collect();
                    frontier.mark_visited(&succeeded);
                }

                for record in parsed.values() {
                    for id in record.products() {
                        if frontier.offer(Link::product(id.clone())) {
                            report.discovered_products += 1;
                        }
                    }
                    for id in record.pages() {
                        if frontier.offer(Link::category(id.clone())) {
                            report.discovered_pages += 1;
                        }
                    }
                    if let Some(subcategories) =
                        record.get(Field::Subcategories).and_then(|v| v.as_list())
                    {
                        for id in subcategories {
                            if frontier.offer(Link::category(id.clone())) {
                                report.discovered_pages += 1;
                            }
                        }
                    }
                }
                #[cfg(debug_assertions)]
                frontier.assert_partitioned();
            }

            report.categories_parsed += parsed.len();
            for link in &batch {
                if !parsed.contains_key(link) {
                    warn!(%link, "category yielded no record");
                    report.failed.push(link.clone());
                }
            }

            batches += 1;
            if self.config.checkpoint_every > 0 && batches % self.config.checkpoint_every == 0 {
                self.checkpoint().await?;
            }
            if self.config.batch_delay_ms > 0 {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        report.cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_millis(self.config.batch_delay_ms)) => {}
                }
            }
        }

        self.checkpoint().await?;
        info!(
            parsed = report.categories_parsed,
            discovered_products = report.discovered_products,
            discovered_pages = report.discovered_pages,
            "category expansion done"
        );
        Ok(())
    }

    /// Phase three: drain product links on a bounded worker pool and
    /// publish the records.
    ///
    /// Products discover nothing, so batches can run concurrently; claims
    /// still go through the single shared queue, which keeps FIFO claim
    /// order even though completion order is unspecified.
    async fn harvest_products(&self, report: &mut WalkReport) -> WalkResult<()> {
        let mark_on_claim = self.config.record_products_in_history
            && self.config.visit_policy == VisitPolicy::OnAttempt;
        let mut inflight = FuturesUnordered::new();

        loop {
            while inflight.len() < self.config.product_workers && !report.cancelled {
                let batch =
                    self.lock()
                        .claim(self.config.product_batch, &[LinkKind::Product], mark_on_claim);
                if batch.is_empty() {
                    break;
                }
                debug!(batch = batch.len(), inflight = inflight.len(), "parsing product batch");

                let strategy = Arc::clone(&self.strategy);
                let fields = self.config.product_fields.clone();
                inflight.push(async move {
                    let parsed = strategy.parse_products(&batch, &fields).await;
                    (batch, parsed)
                });
            }

            if inflight.is_empty() {
                break;
            }

            let (batch, parsed) = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    // Dropping the pool cancels in-flight fetches at their
                    // next await point.
                    report.cancelled = true;
                    break;
                }
                Some(done) = inflight.next() => done,
            };

            if self.config.record_products_in_history
                && self.config.visit_policy == VisitPolicy::OnSuccess
            {
                let succeeded: Vec<Link> = parsed.keys().cloned().collect();
                self.lock().mark_visited(&succeeded);
            }

            for link in &batch {
                match parsed.get(link) {
                    Some(record) => {
                        self.sink.publish(link, record).await?;
                        report.products_parsed += 1;
                    }
                    None => {
                        warn!(%link, "product yielded no record");
                        report.failed.push(link.clone());
                    }
                }
            }
        }

        self.checkpoint().await?;
        info!(parsed = report.products_parsed, "product harvest done");
        Ok(())
    }
}

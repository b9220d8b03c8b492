use std::time::Duration;

use crate::normalize::{Normalized, Normalizer};
use crate::sink::ListingSink;
use crate::source::ListingSource;
use crate::stats::{now_ms, StatsSnapshot, SyncStats};
use crate::types::RawOrder;

pub const DEFAULT_ITEM_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Drives pagination over the source and pushes every normalized listing
/// into the sink, one request at a time.
pub struct Syncer<S, K> {
    source: S,
    sink: K,
    normalizer: Normalizer,
    item_delay: Duration,
    page_delay: Duration,
}

impl<S: ListingSource, K: ListingSink> Syncer<S, K> {
    pub fn new(source: S, sink: K, normalizer: Normalizer) -> Self {
        Self {
            source,
            sink,
            normalizer,
            item_delay: DEFAULT_ITEM_DELAY,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    pub fn with_delays(mut self, item_delay: Duration, page_delay: Duration) -> Self {
        self.item_delay = item_delay;
        self.page_delay = page_delay;
        self
    }

    /// Runs until the source has no further cursor, returns an empty page,
    /// or fails. Fetch failures end the run the same way exhaustion does.
    pub async fn run(&self) -> StatsSnapshot {
        let stats = SyncStats::new(now_ms());
        let mut cursor: Option<String> = None;

        loop {
            let page = match self.source.fetch_page(cursor.as_deref()).await {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(error = %e, cursor = ?cursor, "listings fetch failed, stopping");
                    break;
                }
            };
            stats.inc_pages();

            if page.orders.is_empty() {
                tracing::info!(cursor = ?cursor, "no listings in page, stopping");
                break;
            }
            tracing::info!(count = page.orders.len(), has_next = page.next.is_some(), "listings page fetched");

            self.process_page(&page.orders, &stats).await;

            match page.next {
                Some(next) => {
                    tokio::time::sleep(self.page_delay).await;
                    cursor = Some(next);
                }
                None => break,
            }
        }

        let snap = stats.snapshot(now_ms());
        tracing::info!(
            pages = snap.pages_fetched,
            total_scanned = snap.total_scanned,
            total_sent = snap.total_sent,
            skipped = snap.skipped,
            "sync finished"
        );
        snap
    }

    async fn process_page(&self, orders: &[RawOrder], stats: &SyncStats) {
        for raw in orders {
            let listing = match self.normalizer.normalize(raw) {
                Normalized::Listing(l) => l,
                Normalized::Skip(reason) => {
                    stats.inc_skipped();
                    tracing::debug!(%reason, "skipping order");
                    continue;
                }
            };

            stats.inc_scanned();
            if self.sink.forward(&listing).await {
                stats.inc_sent();
            }
            tokio::time::sleep(self.item_delay).await;
        }
    }
}

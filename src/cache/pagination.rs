//! Pagination Cache Module
//!
//! Index-addressed facade over the page store. Translates absolute item
//! indices into page fetches, triggers adjacent-page prefetch near page
//! boundaries, and exposes point replacement and invalidation.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use crate::cache::{CacheStats, PageFetch, PageHandle, PageStore};
use crate::config::CacheConfig;
use crate::error::{Result, TransportError};

/// Buffered total-count change notifications per subscriber.
const TOTAL_COUNT_CHANNEL_CAPACITY: usize = 16;

// == Page Source ==
/// Abstract data source the cache fetches pages from.
///
/// `fetch_page(page)` must honor the cache's configured page size: page `p`
/// covers absolute indices `p * page_size .. (p + 1) * page_size`. A short
/// or empty page signals end of data.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Fetches one page of items in source order.
    async fn fetch_page(&self, page: u64) -> std::result::Result<PageFetch<Self::Item>, TransportError>;
}

// == Total Count Change ==
/// Side-channel notification: the source reported a different total item
/// count than the previous successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalCountChange {
    /// Last known total, None before the first report
    pub previous: Option<u64>,
    /// Newly reported total
    pub current: u64,
}

/// Tracks the last reported total and fans out changes.
#[derive(Debug)]
struct TotalCountTracker {
    last: Mutex<Option<u64>>,
    changes: broadcast::Sender<TotalCountChange>,
}

impl TotalCountTracker {
    fn new() -> Self {
        let (changes, _) = broadcast::channel(TOTAL_COUNT_CHANNEL_CAPACITY);
        Self {
            last: Mutex::new(None),
            changes,
        }
    }

    /// Records a total reported by a successful fetch, emitting a change
    /// notification only when the value differs from the previous one.
    fn observe(&self, total: u64) {
        let mut last = self.last.lock();
        if *last != Some(total) {
            let change = TotalCountChange {
                previous: *last,
                current: total,
            };
            *last = Some(total);
            debug!(previous = ?change.previous, current = change.current, "total item count changed");
            let _ = self.changes.send(change);
        }
    }
}

// == Pagination Cache ==
/// Loading cache that provides a clean interface for fetching items by
/// absolute index. Behind the scenes, pages of items are fetched and cached
/// to minimize expensive data retrieval calls; adjacent pages may also be
/// fetched proactively when `prefetch_threshold` is set.
pub struct PaginationCache<S: PageSource> {
    source: Arc<S>,
    store: Arc<PageStore<S::Item>>,
    total: Arc<TotalCountTracker>,
    page_size: u64,
    prefetch_threshold: u64,
}

impl<S: PageSource> PaginationCache<S> {
    // == Constructor ==
    /// Creates a cache over `source` with the given parameters.
    ///
    /// Fails with `InvalidArgument` when `page_size` is zero or
    /// `max_pages_cached` is zero. Ensure `page_size` corresponds with what
    /// `source.fetch_page` returns.
    pub fn new(source: S, config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source: Arc::new(source),
            store: Arc::new(PageStore::new(config.max_pages_cached)),
            total: Arc::new(TotalCountTracker::new()),
            page_size: config.page_size,
            prefetch_threshold: config.prefetch_threshold,
        })
    }

    // == Get ==
    /// Gets the item at absolute position `index`.
    ///
    /// May trigger fetching of the page and an adjacent page when
    /// `prefetch_threshold` is set. For example, with page size 10 and
    /// threshold 2, page 2 is prefetched upon `get(30)` and `get(31)`, and
    /// page 4 upon `get(38)` and `get(39)`.
    ///
    /// Yields `Ok(None)` when `index` lies past the end of the data (the
    /// backing page came back short); fetch failures propagate for this
    /// call only and stay cached for the page's residency.
    pub async fn get(&self, index: u64) -> Result<Option<S::Item>> {
        let page = index / self.page_size;
        let offset = (index % self.page_size) as usize;

        // proactively fetch prev/next page if we're close
        if self.prefetch_threshold > 0 {
            if (offset as u64) < self.prefetch_threshold && page >= 1 {
                self.prefetch(page - 1);
            } else if self.page_size - offset as u64 <= self.prefetch_threshold {
                self.prefetch(page + 1);
            }
        }

        let items = self.load_page(page).resolve().await?;
        Ok(items.get(offset).cloned())
    }

    // == Get Page ==
    /// Gets the ordered items of one page.
    ///
    /// A short or empty sequence means no more data; it is not an error.
    pub async fn get_page(&self, page: u64) -> Result<Arc<Vec<S::Item>>> {
        self.load_page(page).resolve().await
    }

    // == Replace ==
    /// Replaces the item at `index` with `value`.
    ///
    /// Best-effort local overlay: does nothing if the page isn't resident
    /// or hasn't resolved yet. Never blocks on a pending fetch and never
    /// triggers a new one. The new snapshot stays until the next
    /// invalidation or eviction; it is not re-validated against the source.
    pub fn replace(&self, index: u64, value: S::Item) {
        let page = index / self.page_size;
        let offset = (index % self.page_size) as usize;
        if let Some(handle) = self.store.peek(page) {
            handle.replace_item(offset, value);
        }
    }

    // == Invalidate ==
    /// Evicts one page, cancelling its fetch if still in flight.
    pub fn invalidate(&self, page: u64) {
        self.store.invalidate(page);
    }

    // == Invalidate All ==
    /// Evicts every resident page.
    pub fn invalidate_all(&self) {
        self.store.invalidate_all();
    }

    // == Accessors ==
    /// The configured page size.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Last total item count reported by the source, if any.
    pub fn total_count(&self) -> Option<u64> {
        *self.total.last.lock()
    }

    /// Subscribes to total-count change notifications. A change is emitted
    /// only when the reported value differs between consecutive successful
    /// fetches.
    pub fn total_count_changes(&self) -> broadcast::Receiver<TotalCountChange> {
        self.total.changes.subscribe()
    }

    /// Current page store statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    // == Internal ==
    /// Returns the resident handle for `page`, starting a fetch if absent.
    fn load_page(&self, page: u64) -> PageHandle<S::Item> {
        let source = Arc::clone(&self.source);
        let total = Arc::clone(&self.total);
        self.store.get_or_load(page, move || async move {
            let fetch = source.fetch_page(page).await?;
            if let Some(count) = fetch.total_count {
                total.observe(count);
            }
            Ok(Arc::new(fetch.items))
        })
    }

    /// Fire-and-forget load of an adjacent page. Registers the fetch and
    /// returns immediately; a prefetch failure is cached on its own page
    /// and never surfaces through the triggering call.
    fn prefetch(&self, page: u64) {
        debug!(page, "prefetching adjacent page");
        let _ = self.load_page(page);
    }
}

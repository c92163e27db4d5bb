//! Page Store Module
//!
//! Bounded single-flight page map: holds fetched pages, evicts the
//! least-recently-accessed page at capacity, and cancels a page's in-flight
//! fetch as part of the same critical section that removes it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheStats, LruTracker, PageHandle};
use crate::error::Result;
use crate::task::SharedTask;

// == Store Inner ==
/// Shared mutable state: the page mapping, access order, and counters.
///
/// Invariant: a page number is present in `pages` if and only if its fetch
/// handle has not been cancelled/released by this store. Eviction removes
/// the entry and cancels the handle under one lock acquisition, so a fetch
/// completing concurrently can never repopulate a removed slot.
#[derive(Debug)]
struct StoreInner<T> {
    pages: HashMap<u64, PageHandle<T>>,
    lru: LruTracker,
    stats: CacheStats,
}

// == Page Store ==
/// Bounded page cache with single-flight fetch deduplication.
///
/// Safe to share across tasks; all mutation goes through the internal lock.
#[derive(Debug)]
pub struct PageStore<T> {
    inner: Mutex<StoreInner<T>>,
    max_pages: usize,
}

impl<T> PageStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a store that keeps at most `max_pages` pages resident.
    pub fn new(max_pages: usize) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                pages: HashMap::new(),
                lru: LruTracker::new(),
                stats: CacheStats::new(),
            }),
            max_pages,
        }
    }

    // == Get Or Load ==
    /// Returns the resident handle for `page`, or registers a new one and
    /// starts `loader` on the worker pool.
    ///
    /// Single-flight guarantee: while a page is resident, concurrent callers
    /// share one handle and `loader` is invoked exactly once, whether the
    /// fetch is pending, resolved, or failed. A failed fetch stays cached as
    /// the page's terminal state until invalidation or eviction; there is no
    /// internal retry.
    ///
    /// Any call for an existing page refreshes its recency. Inserting at
    /// capacity evicts the least-recently-accessed page and cancels its
    /// fetch in the same critical section.
    pub fn get_or_load<F, Fut>(&self, page: u64, loader: F) -> PageHandle<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<Vec<T>>>> + Send + 'static,
    {
        let mut inner = self.inner.lock();

        if let Some(handle) = inner.pages.get(&page) {
            let handle = handle.clone();
            inner.lru.touch(page);
            inner.stats.record_hit();
            return handle;
        }

        inner.stats.record_miss();

        if inner.pages.len() >= self.max_pages {
            if let Some(oldest) = inner.lru.evict_oldest() {
                if let Some(evicted) = inner.pages.remove(&oldest) {
                    evicted.cancel();
                    inner.stats.record_eviction();
                    debug!(page = oldest, "evicted least-recently-accessed page");
                }
            }
        }

        debug!(page, "starting page fetch");
        let handle = PageHandle::new(SharedTask::spawn(loader()));
        inner.pages.insert(page, handle.clone());
        inner.lru.touch(page);
        let resident = inner.pages.len();
        inner.stats.set_resident_pages(resident);
        handle
    }

    // == Peek ==
    /// Returns the resident handle without refreshing recency or loading.
    ///
    /// Used by best-effort operations (item replacement) that must not count
    /// as an access.
    pub fn peek(&self, page: u64) -> Option<PageHandle<T>> {
        self.inner.lock().pages.get(&page).cloned()
    }

    // == Invalidate ==
    /// Forcibly evicts one page, cancelling its fetch if still in flight.
    pub fn invalidate(&self, page: u64) {
        let mut inner = self.inner.lock();
        if let Some(handle) = inner.pages.remove(&page) {
            handle.cancel();
            inner.lru.remove(page);
            let resident = inner.pages.len();
            inner.stats.set_resident_pages(resident);
            debug!(page, "invalidated page");
        }
    }

    // == Invalidate All ==
    /// Evicts every page, cancelling in-flight fetches.
    pub fn invalidate_all(&self) {
        let mut inner = self.inner.lock();
        let count = inner.pages.len();
        for (_, handle) in inner.pages.drain() {
            handle.cancel();
        }
        inner.lru.clear();
        inner.stats.set_resident_pages(0);
        debug!(count, "invalidated all pages");
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_resident_pages(inner.pages.len());
        stats
    }

    // == Length ==
    /// Returns the number of resident pages.
    pub fn len(&self) -> usize {
        self.inner.lock().pages.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.inner.lock().pages.is_empty()
    }

    // == Contains ==
    /// Checks whether a page is resident, without touching recency.
    pub fn contains(&self, page: u64) -> bool {
        self.inner.lock().pages.contains_key(&page)
    }
}

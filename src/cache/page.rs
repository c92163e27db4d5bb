//! Page Module
//!
//! Defines what a data source returns for one page and the shareable handle
//! callers await while a page resolves.

use std::sync::Arc;

use crate::error::Result;
use crate::task::SharedTask;

// == Page Fetch ==
/// One page of items as returned by the data source.
///
/// A page shorter than the configured page size (including an empty one)
/// means end of data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetch<T> {
    /// Items in source order
    pub items: Vec<T>,
    /// Total item count across all pages, when the source reports it
    pub total_count: Option<u64>,
}

impl<T> PageFetch<T> {
    /// Creates a page with no total-count metadata.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total_count: None,
        }
    }

    /// Creates a page carrying total-count metadata.
    pub fn with_total(items: Vec<T>, total_count: u64) -> Self {
        Self {
            items,
            total_count: Some(total_count),
        }
    }
}

// == Page Handle ==
/// Shareable handle to a resident page.
///
/// Wraps the page's single-flight fetch task. All callers in the same
/// residency period share one handle; the cached items (or the cached
/// fetch error) are retained until the page is evicted or invalidated.
#[derive(Debug, Clone)]
pub struct PageHandle<T> {
    task: SharedTask<Arc<Vec<T>>>,
}

impl<T> PageHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(task: SharedTask<Arc<Vec<T>>>) -> Self {
        Self { task }
    }

    // == Resolve ==
    /// Suspends until the fetch settles and yields the page's items.
    ///
    /// Yields the cached error if the fetch failed, or
    /// [`crate::error::CacheError::Cancelled`] if the page was evicted while
    /// still loading.
    pub async fn resolve(&self) -> Result<Arc<Vec<T>>> {
        self.task.wait().await
    }

    // == Try Items ==
    /// Non-blocking peek. `None` while the fetch is still in flight.
    pub fn try_items(&self) -> Option<Result<Arc<Vec<T>>>> {
        self.task.try_result()
    }

    // == Replace Item ==
    /// Swaps the item at `offset` in a resolved page for `value`, producing
    /// a new snapshot that becomes the cached content.
    ///
    /// Silent no-op if the fetch is pending, failed, or `offset` is out of
    /// bounds. Never blocks and never triggers a fetch.
    pub(crate) fn replace_item(&self, offset: usize, value: T) -> bool {
        let mut value = Some(value);
        self.task.replace_ready(|items| {
            if offset < items.len() {
                let mut next = (**items).clone();
                // take() cannot fail: replace_ready invokes at most once
                if let Some(v) = value.take() {
                    next[offset] = v;
                }
                Arc::new(next)
            } else {
                Arc::clone(items)
            }
        })
    }

    // == Cancel ==
    /// Cancels the in-flight fetch; waiters observe cancellation. A page
    /// that already resolved keeps its result for existing holders.
    pub(crate) fn cancel(&self) {
        self.task.cancel();
    }

    /// Returns true while the fetch has not settled.
    pub fn is_loading(&self) -> bool {
        self.task.is_running()
    }
}

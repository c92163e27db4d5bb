//! LRU Tracker Module
//!
//! Implements least-recently-accessed tracking for page eviction.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks page access order for LRU eviction.
///
/// Page numbers are stored in a VecDeque where:
/// - Front = Most recently accessed
/// - Back = Least recently accessed
///
/// Any access (get, getPage, or a prefetch trigger) counts as a recency
/// touch, so eviction order is least-recently-*accessed*, not
/// least-recently-inserted.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Pages ordered by last access
    order: VecDeque<u64>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a page as recently accessed (moves to front).
    pub fn touch(&mut self, page: u64) {
        self.remove(page);
        self.order.push_front(page);
    }

    // == Remove ==
    /// Removes a page from the tracker.
    pub fn remove(&mut self, page: u64) {
        self.order.retain(|p| *p != page);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently accessed page.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<u64> {
        self.order.pop_back()
    }

    // == Peek Oldest ==
    /// Returns the least recently accessed page without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<u64> {
        self.order.back().copied()
    }

    // == Clear ==
    /// Drops all tracked pages.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked pages.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a page is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, page: u64) -> bool {
        self.order.iter().any(|p| *p == page)
    }
}

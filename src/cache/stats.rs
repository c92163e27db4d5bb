//! Cache Statistics Module
//!
//! Tracks page store performance metrics: hits, misses (loads), and
//! evictions.

use serde::Serialize;

// == Cache Stats ==
/// Page store performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Requests served by an already-resident page handle
    pub hits: u64,
    /// Requests that triggered a new source fetch
    pub misses: u64,
    /// Pages evicted by the LRU policy
    pub evictions: u64,
    /// Pages currently resident (loading or resolved)
    pub resident_pages: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Resident Count ==
    /// Updates the resident page count.
    pub fn set_resident_pages(&mut self, count: usize) {
        self.resident_pages = count;
    }
}

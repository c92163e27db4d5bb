//! Cache Module
//!
//! Index-addressed pagination over a bounded, single-flight page store with
//! LRU eviction and adjacent-page prefetch.

mod lru;
mod page;
mod pagination;
mod stats;
mod store;


// Re-export public types
pub use lru::LruTracker;
pub use page::{PageFetch, PageHandle};
pub use pagination::{PageSource, PaginationCache, TotalCountChange};
pub use stats::CacheStats;
pub use store::PageStore;

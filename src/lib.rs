//! Data Sync Core - reusable in-process sync primitives
//!
//! Two infrastructure pieces used by list-driven UIs: a paginating
//! load-cache that turns "fetch item by absolute index" into deduplicated,
//! evictable page fetches, and a time-windowed replay event bus that lets
//! suspended consumers catch up on missed events. Both are safe under
//! concurrent access from uncoordinated callers.

pub mod bus;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod task;

pub use bus::{Driver, EventBus, EventStream, Replay};
pub use cache::{PageFetch, PageSource, PaginationCache, TotalCountChange};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{BusConfig, CacheConfig, DEFAULT_TTL_SECONDS};
pub use error::{CacheError, Result, TransportError};

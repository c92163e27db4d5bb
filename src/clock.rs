//! Clock Abstraction Module
//!
//! A monotonic time source decoupled from wall-clock time. Both the event
//! bus and the page store owners draw "now" from the same injected clock so
//! replay windows stay consistent and tests can use a manual clock.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

// == Clock Trait ==
/// Monotonic time source.
///
/// `now()` returns a monotonically non-decreasing timestamp in milliseconds.
/// Implementations must not be wall-clock adjustable; a clock that jumps
/// backwards corrupts replay windows.
pub trait Clock: Send + Sync + Debug {
    /// Current timestamp in milliseconds on this clock's timeline.
    fn now(&self) -> u64;
}

// == Monotonic Clock ==
/// Production clock: milliseconds elapsed since the clock was constructed.
///
/// Backed by `std::time::Instant`, so it is immune to wall-clock changes.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose timeline starts at zero.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

// == Manual Clock ==
/// Test clock advanced explicitly by the caller.
///
/// Starts at zero. `advance` moves time forward; time never moves backwards.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manual clock at the given timestamp.
    pub fn at(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    /// Advances the clock by `delta_ms` milliseconds.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

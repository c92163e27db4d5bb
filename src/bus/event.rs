//! Event Envelope Module
//!
//! A posted event is an opaque typed payload stamped with the bus clock's
//! time at post time. Events are immutable once posted.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

// == Stamped Event ==
/// Type-erased event with its post timestamp.
#[derive(Clone)]
pub struct Stamped {
    /// Bus clock time at which the event was posted (milliseconds)
    pub timestamp: u64,
    /// The posted value; typed access goes through a [`crate::bus::Driver`]
    pub payload: Arc<dyn Any + Send + Sync>,
}

impl fmt::Debug for Stamped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stamped")
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

// == Replay Mode ==
/// How a new subscription treats events posted before it existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// First replay retained events stamped at or after this timestamp
    /// (inclusive), in timestamp order, then continue with live events.
    Since(u64),
    /// Deliver only events posted after subscription. A fresh consumer with
    /// no stale cache has nothing to catch up on.
    FutureOnly,
}

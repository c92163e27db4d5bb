//! Event Bus Module
//!
//! Process-wide, timestamped publish/subscribe channel with a bounded
//! retention window. Events are retained for the TTL so a consumer that was
//! suspended for an unknown duration can subscribe with a resume timestamp
//! and catch up on what it missed. An example use case is a screen that
//! caches a list of items while suspended and also listens for deletion
//! events: deletions occurring while it was down would otherwise leave it
//! rendering a stale list.

use std::any::Any;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::bus::event::{Replay, Stamped};
use crate::bus::stream::EventStream;
use crate::clock::Clock;
use crate::config::BusConfig;

// == Bus Inner ==
/// Shared mutable state: the retained-event window and live subscribers.
///
/// Posts and subscription setup serialize on this lock, so a subscriber's
/// backlog snapshot and its live registration see a consistent boundary:
/// no event is duplicated or missed between replay and live delivery.
struct BusInner {
    retained: VecDeque<Stamped>,
    subscribers: Vec<mpsc::UnboundedSender<Stamped>>,
}

// == Event Bus ==
/// Timestamped event bus with time-windowed replay.
///
/// Explicitly constructed and passed by its owner; intended to be created
/// once per process and shared via `Arc`. Posting and subscribing cannot
/// fail and never block the caller.
pub struct EventBus {
    clock: Arc<dyn Clock>,
    ttl_ms: u64,
    inner: Mutex<BusInner>,
}

impl EventBus {
    // == Constructor ==
    /// Creates a bus stamping events with `clock` and retaining them for
    /// the configured TTL.
    pub fn new(clock: Arc<dyn Clock>, config: BusConfig) -> Self {
        Self {
            clock,
            ttl_ms: config.ttl_seconds * 1000,
            inner: Mutex::new(BusInner {
                retained: VecDeque::new(),
                subscribers: Vec::new(),
            }),
        }
    }

    // == Post ==
    /// Stamps `payload` with the bus clock and delivers it to current
    /// subscribers and the retention window.
    ///
    /// Timestamping happens under the bus lock, so retained events are in
    /// non-decreasing timestamp order.
    pub(crate) fn post_any(&self, payload: Arc<dyn Any + Send + Sync>) {
        let inner = &mut *self.inner.lock();
        let timestamp = self.clock.now();
        let stamped = Stamped { timestamp, payload };

        prune_expired(&mut inner.retained, timestamp, self.ttl_ms);
        inner.retained.push_back(stamped.clone());
        // Delivery also sweeps out subscribers that dropped their stream
        inner
            .subscribers
            .retain(|tx| tx.send(stamped.clone()).is_ok());
    }

    // == Subscribe ==
    /// Registers a subscriber and snapshots its replay backlog.
    pub(crate) fn subscribe_any(
        &self,
        replay: Replay,
    ) -> (VecDeque<Stamped>, mpsc::UnboundedReceiver<Stamped>) {
        let inner = &mut *self.inner.lock();
        let now = self.clock.now();
        prune_expired(&mut inner.retained, now, self.ttl_ms);

        let backlog = match replay {
            Replay::Since(since) => inner
                .retained
                .iter()
                .filter(|stamped| stamped.timestamp >= since)
                .cloned()
                .collect(),
            Replay::FutureOnly => VecDeque::new(),
        };

        let (tx, rx) = mpsc::unbounded_channel();
        inner.subscribers.retain(|s| !s.is_closed());
        inner.subscribers.push(tx);
        debug!(
            ?replay,
            backlog = backlog.len(),
            subscribers = inner.subscribers.len(),
            "subscription registered"
        );
        (backlog, rx)
    }

    // == Retained Count ==
    /// Number of events currently in the retention window, pruning first.
    pub fn retained_len(&self) -> usize {
        let inner = &mut *self.inner.lock();
        prune_expired(&mut inner.retained, self.clock.now(), self.ttl_ms);
        inner.retained.len()
    }
}

/// Drops events whose TTL has fully elapsed on the bus clock.
///
/// Discard is lazy: it runs on post/subscribe rather than the instant TTL
/// elapses, so an event may be retained slightly longer, but never shorter.
fn prune_expired(retained: &mut VecDeque<Stamped>, now: u64, ttl_ms: u64) {
    let before = retained.len();
    while let Some(front) = retained.front() {
        if now.saturating_sub(front.timestamp) > ttl_ms {
            retained.pop_front();
        } else {
            break;
        }
    }
    let dropped = before - retained.len();
    if dropped > 0 {
        debug!(dropped, "pruned events past the retention window");
    }
}

// == Driver ==
/// Typed facade over the bus for one event kind.
///
/// Posts values of `T` and yields streams containing only events whose
/// payload is a `T`; payloads of other kinds posted on the same bus are
/// filtered out.
pub struct Driver<T> {
    bus: Arc<EventBus>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Driver<T> {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
            _marker: PhantomData,
        }
    }
}

impl<T> Driver<T>
where
    T: Any + Send + Sync,
{
    /// Creates a driver for events of type `T` on `bus`.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            _marker: PhantomData,
        }
    }

    // == Post ==
    /// Posts an event of type `T`. Always succeeds; never blocks.
    pub fn post(&self, value: T) {
        self.bus.post_any(Arc::new(value));
    }

    // == Subscribe ==
    /// Subscribes with the given replay mode.
    ///
    /// `Replay::Since(t)` first yields retained `T` events stamped at or
    /// after `t` (inclusive), in timestamp order, then live events. Use a
    /// resume timestamp saved from this bus's clock; a consumer with no
    /// saved state should use [`Driver::subscribe_live`] instead.
    pub fn subscribe(&self, replay: Replay) -> EventStream<T> {
        let (backlog, live) = self.bus.subscribe_any(replay);
        EventStream::new(backlog, live)
    }

    // == Subscribe Live ==
    /// Subscribes to future events only.
    pub fn subscribe_live(&self) -> EventStream<T> {
        self.subscribe(Replay::FutureOnly)
    }
}

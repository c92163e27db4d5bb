//! Event Stream Module
//!
//! The subscriber half of a bus subscription: drains the replay backlog in
//! timestamp order, then yields live events as they arrive. Dropping the
//! stream cancels the subscription.

use std::any::Any;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::bus::event::Stamped;

// == Event Stream ==
/// Long-lived stream of events of type `T`.
///
/// Never terminates on its own; it ends when the subscriber drops it (or,
/// degenerately, when the bus itself is gone). Events whose payload is not
/// a `T` are skipped, which is how the kind filter is applied.
#[derive(Debug)]
pub struct EventStream<T> {
    backlog: VecDeque<Stamped>,
    live: mpsc::UnboundedReceiver<Stamped>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EventStream<T>
where
    T: Any + Send + Sync,
{
    pub(crate) fn new(backlog: VecDeque<Stamped>, live: mpsc::UnboundedReceiver<Stamped>) -> Self {
        Self {
            backlog,
            live,
            _marker: PhantomData,
        }
    }

    // == Next ==
    /// Suspends until the next matching event.
    ///
    /// Replayed events come first, in non-decreasing timestamp order, then
    /// live events in arrival order. Returns `None` only if the bus was
    /// dropped while the subscription was still open.
    pub async fn next(&mut self) -> Option<Arc<T>> {
        loop {
            let stamped = match self.backlog.pop_front() {
                Some(stamped) => stamped,
                None => self.live.recv().await?,
            };
            if let Ok(event) = stamped.payload.downcast::<T>() {
                return Some(event);
            }
        }
    }

    // == Try Next ==
    /// Non-blocking variant of [`EventStream::next`]. `None` when no
    /// matching event is currently available.
    pub fn try_next(&mut self) -> Option<Arc<T>> {
        loop {
            let stamped = match self.backlog.pop_front() {
                Some(stamped) => stamped,
                None => self.live.try_recv().ok()?,
            };
            if let Ok(event) = stamped.payload.downcast::<T>() {
                return Some(event);
            }
        }
    }
}

//! Bus Module
//!
//! Timestamped publish/subscribe with time-windowed replay, so consumers
//! suspended for an unknown duration can catch up on missed events.

mod bus;
mod event;
mod stream;

// Re-export public types
pub use bus::{Driver, EventBus};
pub use event::{Replay, Stamped};
pub use stream::EventStream;

//! Error types for the data sync core
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Transport Error ==
/// Failure reported by the external data source for a page fetch.
///
/// Transport errors are cached as the page's terminal state for its current
/// residency: every caller of that page sees the same error until the page
/// is invalidated or evicted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

// == Cache Error Enum ==
/// Unified error type for the pagination cache and event bus.
///
/// Absence of data is never an error: a page shorter than the page size
/// yields `Ok(None)` from `get` and an empty sequence from `get_page`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Caller bug: invalid construction parameter
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Data-source fetch failure, surfaced per call and cached per residency
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The awaited page fetch was evicted or invalidated out from under the caller
    #[error("page fetch cancelled")]
    Cancelled,
}

// == Result Type Alias ==
/// Convenience Result type for the data sync core.
pub type Result<T> = std::result::Result<T, CacheError>;

//! Configuration Module
//!
//! Handles cache and bus parameters with environment overrides and
//! construction-time validation.

use std::env;

use crate::error::{CacheError, Result};

/// Default replay window for the event bus, in seconds.
pub const DEFAULT_TTL_SECONDS: u64 = 120;

// == Cache Config ==
/// Pagination cache parameters.
///
/// `page_size` must match the granularity the data source honors.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Number of items per page (> 0)
    pub page_size: u64,
    /// Distance from a page boundary that triggers prefetch of the adjacent
    /// page; 0 disables prefetch
    pub prefetch_threshold: u64,
    /// Maximum number of resident pages before LRU eviction (>= 1)
    pub max_pages_cached: usize,
}

impl CacheConfig {
    /// Creates a CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PAGE_SIZE` - Items per page (default: 50)
    /// - `PREFETCH_THRESHOLD` - Prefetch trigger distance (default: 10)
    /// - `MAX_PAGES_CACHED` - Resident page bound (default: 16)
    pub fn from_env() -> Self {
        Self {
            page_size: env::var("PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            prefetch_threshold: env::var("PREFETCH_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            max_pages_cached: env::var("MAX_PAGES_CACHED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(16),
        }
    }

    /// Validates the parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(CacheError::InvalidArgument(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if self.max_pages_cached == 0 {
            return Err(CacheError::InvalidArgument(
                "max_pages_cached must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            prefetch_threshold: 10,
            max_pages_cached: 16,
        }
    }
}

// == Bus Config ==
/// Event bus retention parameters.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Replay window: events are retained at least this long
    pub ttl_seconds: u64,
}

impl BusConfig {
    /// Creates a BusConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BUS_TTL_SECONDS` - Replay window in seconds (default: 120)
    pub fn from_env() -> Self {
        Self {
            ttl_seconds: env::var("BUS_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECONDS),
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

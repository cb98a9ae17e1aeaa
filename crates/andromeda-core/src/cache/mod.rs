//! Resolution caching for on-chain lookups.
//!
//! Resolving a component's code id takes two network round trips: a kernel `key_address`
//! query to find the registry, then a registry `code_id` query. Neither answer changes often,
//! so both are cached here.
//!
//! ```text
//!   get_or_fetch(key)
//!          │
//!          ▼
//!   ┌──────────────┐  fresh   ┌──────────────┐
//!   │  LRU entries ├─────────►│ return value │
//!   └──────┬───────┘          └──────────────┘
//!          │ missing / expired
//!          ▼
//!   ┌──────────────┐  present ┌──────────────────────┐
//!   │   in-flight  ├─────────►│ await shared fetch   │
//!   └──────┬───────┘          └──────────────────────┘
//!          │ absent
//!          ▼
//!   spawn fetch task, register shared handle,
//!   FetchGuard inserts on success and clears in-flight
//! ```
//!
//! # Guarantees
//!
//! - Entries are fresh for `ttl`; at exactly `ttl` after insertion an entry is expired.
//! - At most `capacity` entries are held; inserting past capacity evicts the least recently
//!   used one. Keys that are still being fetched are not entries and cannot be evicted.
//! - Concurrent callers for the same key share one fetch and observe the same result.
//! - Failures are delivered to every caller waiting on them and are never cached.
//! - The fetch runs on its own task, so a caller that stops waiting does not cancel it for the
//!   others.

mod code_cache;
mod fetch_guard;
mod resolution_cache;

pub use code_cache::{CodeIdCache, CodeIdKey, SystemAddressCache, SystemAddressKey};
pub use resolution_cache::{CacheEntry, ResolutionCache};

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

/// Default time-to-live for resolved values.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached entries.
pub const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionCacheConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for ResolutionCacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL, capacity: DEFAULT_CAPACITY }
    }
}

/// Lock-free counters shared between a cache and its fetch tasks.
#[derive(Debug, Default)]
pub(crate) struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    evictions: AtomicU64,
    failures: AtomicU64,
}

impl CacheStats {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a cache's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    /// Lookups answered from a fresh entry.
    pub hits: u64,
    /// Lookups that started a new fetch.
    pub misses: u64,
    /// Lookups that joined a fetch already in flight.
    pub coalesced: u64,
    pub evictions: u64,
    pub failures: u64,
}

//! `FetchGuard` RAII type for completing in-flight resolutions.
//!
//! A guard is created by [`ResolutionCache::get_or_fetch`](super::ResolutionCache::get_or_fetch)
//! when it registers a new in-flight fetch, and moves into the task that drives the fetch. The
//! task hands the result to [`FetchGuard::complete`], which clears the in-flight marker and,
//! on success, inserts the value, all under one lock acquisition.
//!
//! If the task never reaches `complete` (it panicked, or the runtime shut down), `Drop` clears
//! the in-flight marker so the next caller starts a fresh fetch instead of joining a dead one.

use parking_lot::Mutex;
use std::{hash::Hash, sync::Arc, time::Duration};

use super::{resolution_cache::CacheState, CacheStats};
use crate::errors::QueryError;

pub(crate) struct FetchGuard<K, V>
where
    K: Hash + Eq,
{
    state: Arc<Mutex<CacheState<K, V>>>,
    stats: Arc<CacheStats>,
    /// `None` once the guard has completed
    key: Option<K>,
    ttl: Duration,
}

impl<K, V> FetchGuard<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub(crate) fn new(
        state: Arc<Mutex<CacheState<K, V>>>,
        stats: Arc<CacheStats>,
        key: K,
        ttl: Duration,
    ) -> Self {
        Self { state, stats, key: Some(key), ttl }
    }

    /// Marks the fetch complete. Failures are never cached.
    pub(crate) fn complete(mut self, result: &Result<V, QueryError>) {
        let Some(key) = self.key.take() else {
            return;
        };

        let mut state = self.state.lock();
        state.inflight.remove(&key);

        match result {
            Ok(value) => {
                if state.insert(key, value.clone(), self.ttl).is_some() {
                    self.stats.record_eviction();
                }
            }
            Err(_) => self.stats.record_failure(),
        }
    }
}

impl<K, V> Drop for FetchGuard<K, V>
where
    K: Hash + Eq,
{
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.state.lock().inflight.remove(&key);
            self.stats.record_failure();
        }
    }
}

use futures::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use lru::LruCache;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    fmt,
    future::Future,
    hash::Hash,
    num::NonZeroUsize,
    sync::Arc,
    time::Duration,
};
use tokio::time::Instant;

use super::{fetch_guard::FetchGuard, CacheStats, CacheStatsSnapshot, ResolutionCacheConfig};
use crate::errors::QueryError;

pub(crate) type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, QueryError>>>;

/// A cached value and the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        Self { value, inserted_at: Instant::now(), ttl }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

pub(crate) struct CacheState<K, V>
where
    K: Hash + Eq,
{
    pub(crate) entries: LruCache<K, CacheEntry<V>>,
    pub(crate) inflight: HashMap<K, SharedFetch<V>>,
}

impl<K, V> CacheState<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    pub(crate) fn new(capacity: NonZeroUsize) -> Self {
        Self { entries: LruCache::new(capacity), inflight: HashMap::new() }
    }

    /// Returns a fresh value and marks it most recently used. Expired entries are dropped.
    fn fresh(&mut self, key: &K, now: Instant) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.pop(key);
        }
        None
    }

    /// Stores a value, returning the key of the entry evicted to make room, if any.
    pub(crate) fn insert(&mut self, key: K, value: V, ttl: Duration) -> Option<K>
    where
        K: Clone,
    {
        match self.entries.push(key.clone(), CacheEntry::new(value, ttl)) {
            Some((evicted, _)) if evicted != key => Some(evicted),
            _ => None,
        }
    }
}

/// TTL + LRU cache that coalesces concurrent fetches for the same key.
///
/// Cloning is cheap and clones share state.
pub struct ResolutionCache<K, V>
where
    K: Hash + Eq,
{
    name: &'static str,
    ttl: Duration,
    state: Arc<Mutex<CacheState<K, V>>>,
    stats: Arc<CacheStats>,
}

impl<K, V> Clone for ResolutionCache<K, V>
where
    K: Hash + Eq,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            ttl: self.ttl,
            state: Arc::clone(&self.state),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> fmt::Debug for ResolutionCache<K, V>
where
    K: Hash + Eq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

impl<K, V> ResolutionCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConfig`] for a zero capacity or zero TTL.
    pub fn new(name: &'static str, config: &ResolutionCacheConfig) -> Result<Self, QueryError> {
        let capacity = NonZeroUsize::new(config.capacity)
            .ok_or_else(|| QueryError::InvalidConfig(format!("{name} cache capacity must be > 0")))?;
        if config.ttl.is_zero() {
            return Err(QueryError::InvalidConfig(format!("{name} cache ttl must be > 0")));
        }

        Ok(Self {
            name,
            ttl: config.ttl,
            state: Arc::new(Mutex::new(CacheState::new(capacity))),
            stats: Arc::new(CacheStats::default()),
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value if present and fresh. Never fetches.
    pub fn lookup(&self, key: &K) -> Option<V> {
        self.state.lock().fresh(key, Instant::now())
    }

    /// Returns the cached value for `key`, fetching it at most once across concurrent callers.
    ///
    /// `fetch` is only invoked on a miss with no fetch in flight. It is called while the cache
    /// lock is held and must only construct the future, not touch this cache.
    ///
    /// # Errors
    ///
    /// Returns the fetch's error to every caller that was waiting on it, or
    /// [`QueryError::FetchAborted`] if the fetch task panicked.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<V, QueryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, QueryError>> + Send + 'static,
    {
        let pending = {
            let mut state = self.state.lock();

            if let Some(value) = state.fresh(&key, Instant::now()) {
                self.stats.record_hit();
                tracing::debug!(cache = self.name, key = ?key, "cache hit");
                return Ok(value);
            }

            if let Some(pending) = state.inflight.get(&key) {
                self.stats.record_coalesced();
                tracing::debug!(cache = self.name, key = ?key, "joining in-flight fetch");
                pending.clone()
            } else {
                self.stats.record_miss();
                tracing::debug!(cache = self.name, key = ?key, "cache miss, fetching");

                let guard = FetchGuard::new(
                    Arc::clone(&self.state),
                    Arc::clone(&self.stats),
                    key.clone(),
                    self.ttl,
                );
                let fetch = fetch();
                let handle = tokio::spawn(async move {
                    let result = fetch.await;
                    guard.complete(&result);
                    result
                });

                let pending: SharedFetch<V> = async move {
                    handle.await.unwrap_or_else(|e| Err(QueryError::FetchAborted(e.to_string())))
                }
                .boxed()
                .shared();
                state.inflight.insert(key, pending.clone());
                pending
            }
        };

        pending.await
    }

    /// Removes one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &K) -> bool {
        self.state.lock().entries.pop(key).is_some()
    }

    /// Removes every entry. Fetches in flight are unaffected.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Number of stored entries, including any that have expired but not yet been dropped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn inflight_count(&self) -> usize {
        self.state.lock().inflight.len()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}

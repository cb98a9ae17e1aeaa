use std::sync::Arc;

use super::{CacheStatsSnapshot, ResolutionCache, ResolutionCacheConfig};
use crate::{
    address::ContractAddress,
    chain::ContractQuerier,
    errors::QueryError,
    resolver,
    types::{AdoVersion, ChainId, SystemKey},
};

/// Identifies a resolved code id.
///
/// The registry is named by the kernel that publishes it and the capability key it is published
/// under, so a hit skips the kernel round trip as well as the registry one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeIdKey {
    pub chain: ChainId,
    pub kernel: ContractAddress,
    pub registry_key: SystemKey,
    pub component: AdoVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemAddressKey {
    pub chain: ChainId,
    pub kernel: ContractAddress,
    pub key: SystemKey,
}

pub type SystemAddressCache = ResolutionCache<SystemAddressKey, ContractAddress>;

/// Caches `component@version` → code id resolutions.
#[derive(Debug, Clone)]
pub struct CodeIdCache {
    cache: ResolutionCache<CodeIdKey, u64>,
}

impl CodeIdCache {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConfig`] for a zero capacity or zero TTL.
    pub fn new(config: &ResolutionCacheConfig) -> Result<Self, QueryError> {
        Ok(Self { cache: ResolutionCache::new("code_id", config)? })
    }

    /// Returns the code id for `component`, resolving the registry through `kernel` on a miss.
    ///
    /// # Errors
    ///
    /// Propagates any error from either resolution stage. Errors are not cached.
    pub async fn get_code_id(
        &self,
        chain: &ChainId,
        client: Arc<dyn ContractQuerier>,
        kernel: &ContractAddress,
        registry_key: SystemKey,
        component: &AdoVersion,
    ) -> Result<u64, QueryError> {
        let key = CodeIdKey {
            chain: chain.clone(),
            kernel: kernel.clone(),
            registry_key,
            component: component.clone(),
        };
        let kernel = kernel.clone();
        let component = component.clone();

        self.cache
            .get_or_fetch(key, move || async move {
                let registry =
                    resolver::resolve_system_address(client.as_ref(), &kernel, registry_key).await?;
                resolver::query_code_id(client.as_ref(), &registry, &component).await
            })
            .await
    }

    #[must_use]
    pub fn lookup(&self, key: &CodeIdKey) -> Option<u64> {
        self.cache.lookup(key)
    }

    pub fn invalidate(&self, key: &CodeIdKey) -> bool {
        self.cache.invalidate(key)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }
}

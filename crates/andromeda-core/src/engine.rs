//! Query engine: the single entry point callers use.
//!
//! The engine ties the pool, the resolver and the caches together:
//!
//! - [`QueryEngine::resolve_system_address`]: kernel lookup, cached per chain and key.
//! - [`QueryEngine::get_code_id`]: registry discovery plus code id lookup, cached per component.
//! - [`QueryEngine::query_contract`] / [`QueryEngine::query`] / [`QueryEngine::query_raw`]:
//!   uncached smart queries against an arbitrary contract.
//!
//! Every input is validated before any network traffic: an unknown chain, a malformed address
//! or a malformed message fails without a request being sent.

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::{
    address::ContractAddress,
    cache::{CacheStatsSnapshot, CodeIdCache, ResolutionCacheConfig, SystemAddressCache, SystemAddressKey},
    chain::ContractQuerier,
    config::AppConfig,
    errors::QueryError,
    messages::{self, AdoQuery},
    pool::ChainClientPool,
    resolver,
    types::{AdoVersion, SystemKey},
};

pub struct QueryEngine {
    pool: Arc<ChainClientPool>,
    system_addresses: SystemAddressCache,
    code_ids: CodeIdCache,
}

impl QueryEngine {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConfig`] if `cache` has a zero TTL or capacity.
    pub fn new(pool: Arc<ChainClientPool>, cache: &ResolutionCacheConfig) -> Result<Self, QueryError> {
        Ok(Self {
            pool,
            system_addresses: SystemAddressCache::new("system_address", cache)?,
            code_ids: CodeIdCache::new(cache)?,
        })
    }

    /// Validates `config` and builds the pool and caches it describes.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConfig`] if validation fails, or any error from building
    /// the pool.
    pub fn from_config(config: &AppConfig) -> Result<Self, QueryError> {
        config.validate().map_err(QueryError::InvalidConfig)?;
        let pool = ChainClientPool::from_config(config)?;
        Self::new(Arc::new(pool), &config.resolution_cache_config())
    }

    #[must_use]
    pub fn pool(&self) -> &ChainClientPool {
        &self.pool
    }

    /// Address the kernel on `chain` publishes under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::ChainNotConfigured`] for an unknown chain, otherwise any error
    /// from [`resolver::resolve_system_address`].
    #[instrument(skip(self))]
    pub async fn resolve_system_address(&self, chain: &str, key: SystemKey) -> Result<ContractAddress, QueryError> {
        let client = self.pool.get_client(chain)?;
        let cache_key =
            SystemAddressKey { chain: client.chain_id().clone(), kernel: client.kernel_address().clone(), key };

        self.system_addresses
            .get_or_fetch(cache_key, move || async move {
                resolver::resolve_system_address(&*client, client.kernel_address(), key).await
            })
            .await
    }

    /// Code id of `component` (`name@version`) in the ADO registry on `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::ChainNotConfigured`] for an unknown chain and
    /// [`QueryError::InvalidMessage`] for a malformed component, both before any request.
    #[instrument(skip(self))]
    pub async fn get_code_id(&self, chain: &str, component: &str) -> Result<u64, QueryError> {
        let client = self.pool.get_client(chain)?;
        let component = AdoVersion::parse(component)?;
        let kernel = client.kernel_address().clone();
        let chain_id = client.chain_id().clone();
        let querier: Arc<dyn ContractQuerier> = client;

        self.code_ids.get_code_id(&chain_id, querier, &kernel, SystemKey::Adodb, &component).await
    }

    /// Sends a built query to `contract` on `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::ChainNotConfigured`] or [`QueryError::InvalidAddress`] before any
    /// request, otherwise whatever the chain client returns.
    #[instrument(skip(self, query), fields(kind = %query.kind()))]
    pub async fn query_contract(&self, chain: &str, contract: &str, query: &AdoQuery) -> Result<Value, QueryError> {
        self.query_raw(chain, contract, &query.to_json()?).await
    }

    /// Builds a query from `kind` and `params` (see [`messages::build_query`]) and sends it.
    ///
    /// # Errors
    ///
    /// As [`QueryEngine::query_contract`], plus [`QueryError::InvalidMessage`] for bad params.
    pub async fn query(&self, chain: &str, contract: &str, kind: &str, params: &Value) -> Result<Value, QueryError> {
        let query = messages::build_query(kind, params)?;
        self.query_contract(chain, contract, &query).await
    }

    /// Sends an arbitrary JSON query to `contract` on `chain`.
    ///
    /// # Errors
    ///
    /// As [`QueryEngine::query_contract`].
    #[instrument(skip(self, msg))]
    pub async fn query_raw(&self, chain: &str, contract: &str, msg: &Value) -> Result<Value, QueryError> {
        let client = self.pool.get_client(chain)?;
        let contract = ContractAddress::parse(contract)?;
        client.query_smart(&contract, msg).await
    }

    #[must_use]
    pub fn code_id_cache(&self) -> &CodeIdCache {
        &self.code_ids
    }

    #[must_use]
    pub fn system_address_stats(&self) -> CacheStatsSnapshot {
        self.system_addresses.stats()
    }

    /// Drops every cached resolution.
    pub fn clear_caches(&self) {
        self.system_addresses.clear();
        self.code_ids.clear();
    }
}

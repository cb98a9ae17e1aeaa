//! Chain client pool.
//!
//! The pool owns one [`ChainClient`] per configured chain, built once from [`AppConfig`] and
//! never mutated afterwards, so lookups from any number of tasks need no locking. All clients
//! share a single [`HttpClient`] and therefore a single concurrency limit.

use async_trait::async_trait;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tracing::warn;

use crate::{
    address::ContractAddress,
    chain::{ContractQuerier, HttpClient, LcdClient, RpcClient},
    config::{AppConfig, ChainConfig},
    errors::QueryError,
    types::{ChainId, TransportKind},
};

/// Query capability for one chain.
///
/// Holds the chain's transports in preference order. A query goes to the first; a
/// transport-level failure moves it to the next. Any other failure is returned as is.
pub struct ChainClient {
    chain: ChainId,
    kernel: ContractAddress,
    transports: Vec<Arc<dyn ContractQuerier>>,
}

impl ChainClient {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConfig`] if `transports` is empty.
    pub fn new(
        chain: ChainId,
        kernel: ContractAddress,
        transports: Vec<Arc<dyn ContractQuerier>>,
    ) -> Result<Self, QueryError> {
        if transports.is_empty() {
            return Err(QueryError::InvalidConfig(format!("chain {chain} has no transports")));
        }
        Ok(Self { chain, kernel, transports })
    }

    /// Builds the RPC and/or LCD transports named in `config`, preferred one first.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingKernelAddress`] for an empty kernel address,
    /// [`QueryError::InvalidConfig`] for a malformed one or when no endpoint is configured.
    pub fn from_config(config: &ChainConfig, http_client: &Arc<HttpClient>, app: &AppConfig) -> Result<Self, QueryError> {
        let chain = ChainId::new(config.chain_identifier.trim());

        if config.kernel_address.trim().is_empty() {
            return Err(QueryError::MissingKernelAddress(chain.to_string()));
        }
        let kernel = ContractAddress::parse(config.kernel_address.trim()).map_err(|_| {
            QueryError::InvalidConfig(format!("invalid kernel address for chain {chain}: {}", config.kernel_address))
        })?;

        let timeout = app.request_timeout();
        let rpc = config
            .rpc_url
            .as_deref()
            .map(|url| Arc::new(RpcClient::new(url, Arc::clone(http_client), timeout)) as Arc<dyn ContractQuerier>);
        let lcd = config
            .lcd_url
            .as_deref()
            .map(|url| Arc::new(LcdClient::new(url, Arc::clone(http_client), timeout)) as Arc<dyn ContractQuerier>);

        let transports: Vec<_> = match config.preferred_transport {
            TransportKind::Rpc => rpc.into_iter().chain(lcd).collect(),
            TransportKind::Lcd => lcd.into_iter().chain(rpc).collect(),
        };

        Self::new(chain, kernel, transports)
    }

    #[must_use]
    pub fn chain_id(&self) -> &ChainId {
        &self.chain
    }

    #[must_use]
    pub fn kernel_address(&self) -> &ContractAddress {
        &self.kernel
    }

    /// Transports in the order they are tried.
    #[must_use]
    pub fn transports(&self) -> Vec<TransportKind> {
        self.transports.iter().map(|t| t.transport()).collect()
    }
}

#[async_trait]
impl ContractQuerier for ChainClient {
    fn transport(&self) -> TransportKind {
        self.transports[0].transport()
    }

    async fn query_smart(&self, contract: &ContractAddress, msg: &Value) -> Result<Value, QueryError> {
        let (last, fallbacks) = self
            .transports
            .split_last()
            .ok_or_else(|| QueryError::InvalidConfig(format!("chain {} has no transports", self.chain)))?;

        for transport in fallbacks {
            match transport.query_smart(contract, msg).await {
                Err(e) if e.should_fall_back() => {
                    warn!(
                        chain = %self.chain,
                        transport = %transport.transport(),
                        error = %e,
                        "transport failed, falling back"
                    );
                }
                result => return result,
            }
        }

        last.query_smart(contract, msg).await
    }
}

/// Immutable map of chain identifier to [`ChainClient`].
#[derive(Default)]
pub struct ChainClientPool {
    clients: HashMap<ChainId, Arc<ChainClient>>,
}

impl ChainClientPool {
    /// Builds a client for every configured chain.
    ///
    /// # Errors
    ///
    /// Fails on the first chain whose client cannot be built, or if the shared HTTP client
    /// cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Self, QueryError> {
        let http_client = Arc::new(HttpClient::with_config(config.http_client_config())?);

        let clients = config
            .chains
            .iter()
            .map(|chain| ChainClient::from_config(chain, &http_client, config))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_clients(clients)
    }

    /// Builds a pool from ready-made clients.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConfig`] if two clients share a chain identifier.
    pub fn from_clients(clients: impl IntoIterator<Item = ChainClient>) -> Result<Self, QueryError> {
        let mut map = HashMap::new();
        for client in clients {
            let chain = client.chain_id().clone();
            tracing::debug!(chain = %chain, transports = ?client.transports(), "registered chain client");
            if map.insert(chain.clone(), Arc::new(client)).is_some() {
                return Err(QueryError::InvalidConfig(format!("duplicate chain identifier: {chain}")));
            }
        }
        Ok(Self { clients: map })
    }

    /// # Errors
    ///
    /// Returns [`QueryError::ChainNotConfigured`] for an unknown identifier.
    pub fn get_client(&self, chain: &str) -> Result<Arc<ChainClient>, QueryError> {
        self.clients
            .get(chain)
            .cloned()
            .ok_or_else(|| QueryError::ChainNotConfigured(chain.to_string()))
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = &ChainId> {
        self.clients.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

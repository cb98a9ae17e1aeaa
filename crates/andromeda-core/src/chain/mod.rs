//! Chain endpoint clients.
//!
//! A smart-contract read query can reach a node over two transports:
//!
//! - [`RpcClient`]: Tendermint JSON-RPC `abci_query`, with the query wrapped in a protobuf
//!   `QuerySmartContractStateRequest` and hex-encoded into the request.
//! - [`LcdClient`]: the Cosmos REST gateway, with the query base64-encoded into the URL path.
//!
//! Both implement [`ContractQuerier`]; everything above this module depends only on the trait
//! and never branches on the transport kind. Neither client retries. Falling back from one
//! transport to the other is done by [`ChainClient`](crate::pool::ChainClient).

use async_trait::async_trait;
use serde_json::Value;

use crate::{address::ContractAddress, errors::QueryError, types::TransportKind};

pub mod http_client;
pub mod lcd;
pub mod proto;
pub mod rpc;

pub use http_client::{HttpClient, HttpClientConfig};
pub use lcd::LcdClient;
pub use rpc::RpcClient;

/// Capability to execute a smart-contract read query against a chain.
#[async_trait]
pub trait ContractQuerier: Send + Sync {
    /// Transport used by this querier (informational; for logging only).
    fn transport(&self) -> TransportKind;

    /// Sends `msg` to `contract` and returns the decoded JSON reply.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success node responses and undecodable payloads are returned as
    /// distinct [`QueryError`] variants. Nothing is retried.
    async fn query_smart(&self, contract: &ContractAddress, msg: &Value) -> Result<Value, QueryError>;
}

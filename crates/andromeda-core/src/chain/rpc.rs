use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use prost::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use super::{
    http_client::HttpClient,
    proto::{QuerySmartContractStateRequest, QuerySmartContractStateResponse, SMART_CONTRACT_STATE_PATH},
    ContractQuerier,
};
use crate::{address::ContractAddress, errors::QueryError, types::TransportKind};

#[derive(Debug, Serialize)]
struct AbciQueryRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: AbciQueryParams<'a>,
}

#[derive(Debug, Serialize)]
struct AbciQueryParams<'a> {
    path: &'a str,
    data: String,
    height: &'static str,
    prove: bool,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<AbciQueryResult>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AbciQueryResult {
    response: AbciResponse,
}

#[derive(Debug, Deserialize)]
struct AbciResponse {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    log: String,
    #[serde(default)]
    value: Option<String>,
}

/// Smart-contract queries over Tendermint JSON-RPC (`abci_query`).
pub struct RpcClient {
    url: String,
    http_client: Arc<HttpClient>,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    #[must_use]
    pub fn new(url: impl Into<String>, http_client: Arc<HttpClient>, timeout: Duration) -> Self {
        Self { url: url.into(), http_client, timeout, next_id: AtomicU64::new(1) }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Builds the JSON-RPC body for a smart query against `contract`.
    fn encode_request(&self, contract: &ContractAddress, msg: &Value) -> Result<Vec<u8>, QueryError> {
        let query_data = serde_json::to_vec(msg)
            .map_err(|e| QueryError::InvalidMessage(format!("failed to serialize query: {e}")))?;
        let envelope =
            QuerySmartContractStateRequest { address: contract.as_str().to_string(), query_data };

        let request = AbciQueryRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: "abci_query",
            params: AbciQueryParams {
                path: SMART_CONTRACT_STATE_PATH,
                data: hex::encode(envelope.encode_to_vec()),
                height: "0",
                prove: false,
            },
        };

        serde_json::to_vec(&request)
            .map_err(|e| QueryError::InvalidMessage(format!("failed to serialize request: {e}")))
    }

    /// Unwraps JSON-RPC → ABCI → protobuf → JSON.
    fn decode_response(body: &[u8]) -> Result<Value, QueryError> {
        let response: JsonRpcResponse = serde_json::from_slice(body)
            .map_err(|e| QueryError::InvalidResponse(format!("invalid JSON-RPC response: {e}")))?;

        if let Some(error) = response.error {
            let message = match error.data {
                Some(Value::String(data)) if !data.is_empty() => format!("{}: {data}", error.message),
                Some(Value::Null | Value::String(_)) | None => error.message,
                Some(other) => format!("{}: {other}", error.message),
            };
            return Err(QueryError::RpcError(error.code, message));
        }

        let abci = response
            .result
            .ok_or_else(|| QueryError::missing_field("result", "abci_query response"))?
            .response;

        if abci.code != 0 {
            return Err(QueryError::ContractError { code: abci.code, log: abci.log });
        }

        let value = abci
            .value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| QueryError::missing_field("value", "abci_query response"))?;
        let raw = STANDARD
            .decode(value)
            .map_err(|e| QueryError::InvalidResponse(format!("invalid base64 value: {e}")))?;
        let envelope = QuerySmartContractStateResponse::decode(raw.as_slice())
            .map_err(|e| QueryError::InvalidResponse(format!("invalid protobuf envelope: {e}")))?;

        serde_json::from_slice(&envelope.data)
            .map_err(|e| QueryError::InvalidResponse(format!("contract returned invalid JSON: {e}")))
    }
}

#[async_trait]
impl ContractQuerier for RpcClient {
    fn transport(&self) -> TransportKind {
        TransportKind::Rpc
    }

    async fn query_smart(&self, contract: &ContractAddress, msg: &Value) -> Result<Value, QueryError> {
        let body = self.encode_request(contract, msg)?;

        tracing::debug!(url = %self.url, contract = %contract, "sending abci smart query");

        let bytes = self.http_client.post_json(&self.url, bytes::Bytes::from(body), self.timeout).await?;
        Self::decode_response(&bytes)
    }
}

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use serde::Deserialize;
use serde_json::Value;
use std::{sync::Arc, time::Duration};

use super::{http_client::HttpClient, ContractQuerier};
use crate::{address::ContractAddress, errors::QueryError, types::TransportKind};

/// Error body returned by the Cosmos REST gateway.
#[derive(Debug, Deserialize)]
struct GatewayError {
    code: u32,
    #[serde(default)]
    message: String,
}

/// Smart-contract queries over the Cosmos REST (LCD) gateway.
pub struct LcdClient {
    base_url: String,
    http_client: Arc<HttpClient>,
    timeout: Duration,
}

impl LcdClient {
    #[must_use]
    pub fn new(base_url: &str, http_client: Arc<HttpClient>, timeout: Duration) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), http_client, timeout }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/cosmwasm/wasm/v1/contract/{address}/smart/{base64(query)}`
    ///
    /// The URL-safe alphabet keeps `/` out of the encoded segment; the gateway accepts both.
    pub(crate) fn smart_query_url(&self, contract: &ContractAddress, msg: &Value) -> Result<String, QueryError> {
        let query = serde_json::to_vec(msg)
            .map_err(|e| QueryError::InvalidMessage(format!("failed to serialize query: {e}")))?;
        Ok(format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.base_url,
            contract,
            URL_SAFE.encode(query)
        ))
    }

    fn decode_response(body: &[u8]) -> Result<Value, QueryError> {
        let mut reply: Value = serde_json::from_slice(body)
            .map_err(|e| QueryError::InvalidResponse(format!("invalid LCD response: {e}")))?;

        match reply.get_mut("data").map(Value::take) {
            Some(data) => Ok(data),
            None => Err(QueryError::missing_field("data", "LCD smart query response")),
        }
    }

    /// Lifts a gateway `{code, message}` body out of an HTTP error.
    fn classify_http_error(error: QueryError) -> QueryError {
        if let QueryError::HttpError(_, body) = &error {
            if let Ok(gateway) = serde_json::from_str::<GatewayError>(body) {
                if gateway.code != 0 {
                    return QueryError::ContractError { code: gateway.code, log: gateway.message };
                }
            }
        }
        error
    }
}

#[async_trait]
impl ContractQuerier for LcdClient {
    fn transport(&self) -> TransportKind {
        TransportKind::Lcd
    }

    async fn query_smart(&self, contract: &ContractAddress, msg: &Value) -> Result<Value, QueryError> {
        let url = self.smart_query_url(contract, msg)?;

        tracing::debug!(base_url = %self.base_url, contract = %contract, "sending lcd smart query");

        let bytes = self.http_client.get(&url, self.timeout).await.map_err(Self::classify_http_error)?;
        Self::decode_response(&bytes)
    }
}

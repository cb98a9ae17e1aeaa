//! Chain Node Mock for CosmWasm Smart-Query Testing
//!
//! Wraps mockito to speak both node dialects a chain client uses: Tendermint JSON-RPC
//! `abci_query` (RPC) and the Cosmos REST gateway (LCD). Every helper takes the number of
//! requests it expects so tests can assert exactly how much network traffic an operation
//! caused.

use andromeda_core::chain::proto::QuerySmartContractStateResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mockito::{Matcher, Mock, Server, ServerGuard};
use prost::Message;
use serde_json::{json, Value};

/// Mock chain node answering smart queries over RPC and/or LCD.
pub struct ChainNodeMock {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl ChainNodeMock {
    /// Creates a mock node backed by a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Body matcher for an `abci_query` whose envelope targets `contract` with a message whose
    /// top-level key is `query_key`.
    ///
    /// The envelope is hex-encoded protobuf, so both the address and the start of the JSON
    /// message appear verbatim as hex in the request body.
    fn abci_matcher(contract: &str, query_key: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::Regex(r#""method"\s*:\s*"abci_query""#.to_string()),
            Matcher::Regex(hex::encode(contract)),
            Matcher::Regex(hex::encode(format!("{{\"{query_key}\""))),
        ])
    }

    fn abci_body(code: u32, log: &str, reply: Option<&Value>) -> String {
        let value = reply.map(|reply| {
            let envelope = QuerySmartContractStateResponse { data: reply.to_string().into_bytes() };
            STANDARD.encode(envelope.encode_to_vec())
        });

        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "response": { "code": code, "log": log, "value": value } }
        })
        .to_string()
    }

    /// Mocks a successful RPC smart query.
    pub async fn rpc_smart_query(
        &mut self,
        contract: &str,
        query_key: &str,
        reply: &Value,
        hits: usize,
    ) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Self::abci_matcher(contract, query_key))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Self::abci_body(0, "", Some(reply)))
            .expect(hits)
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Mocks an RPC smart query the contract rejects with a non-zero ABCI code.
    pub async fn rpc_contract_error(
        &mut self,
        contract: &str,
        query_key: &str,
        code: u32,
        log: &str,
        hits: usize,
    ) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Self::abci_matcher(contract, query_key))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Self::abci_body(code, log, None))
            .expect(hits)
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Mocks every RPC request failing with an HTTP status.
    pub async fn rpc_status(&mut self, status: usize, hits: usize) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .with_status(status)
            .with_body("upstream unavailable")
            .expect(hits)
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    fn lcd_path(contract: &str) -> Matcher {
        Matcher::Regex(format!("^/cosmwasm/wasm/v1/contract/{contract}/smart/[A-Za-z0-9_=-]+$"))
    }

    /// Mocks a successful LCD smart query against `contract`.
    pub async fn lcd_smart_query(&mut self, contract: &str, reply: &Value, hits: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", Self::lcd_path(contract))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": reply }).to_string())
            .expect(hits)
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Mocks the gateway's `{code, message}` error reply for `contract`.
    pub async fn lcd_contract_error(&mut self, contract: &str, code: u32, message: &str, hits: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", Self::lcd_path(contract))
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(json!({ "code": code, "message": message, "details": [] }).to_string())
            .expect(hits)
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Asserts every registered mock was hit exactly as often as it expected.
    pub async fn assert_all(&self) {
        for mock in &self.mocks {
            mock.assert_async().await;
        }
    }
}

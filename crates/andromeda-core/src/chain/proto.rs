//! Protobuf envelopes for the CosmWasm smart-query gRPC service.

/// ABCI query path of the smart-contract state query.
pub const SMART_CONTRACT_STATE_PATH: &str = "/cosmwasm.wasm.v1.Query/SmartContractState";

/// `cosmwasm.wasm.v1.QuerySmartContractStateRequest`
#[derive(Clone, PartialEq, prost::Message)]
pub struct QuerySmartContractStateRequest {
    #[prost(string, tag = "1")]
    pub address: String,
    /// Raw JSON query message
    #[prost(bytes = "vec", tag = "2")]
    pub query_data: Vec<u8>,
}

/// `cosmwasm.wasm.v1.QuerySmartContractStateResponse`
#[derive(Clone, PartialEq, prost::Message)]
pub struct QuerySmartContractStateResponse {
    /// Raw JSON reply
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
}

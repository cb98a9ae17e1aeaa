//! System address and code id resolution.
//!
//! Every Andromeda deployment is rooted at a kernel contract. The kernel publishes the
//! addresses of the system contracts (the ADO registry, the VFS, economics, the IBC registry)
//! under well-known keys; the registry in turn maps `component@version` to a code id.

use serde_json::Value;

use crate::{
    address::ContractAddress,
    chain::ContractQuerier,
    errors::QueryError,
    messages::{AdodbQuery, AdoQuery, KernelQuery},
    types::{AdoVersion, SystemKey},
};

/// Asks `kernel` for the address registered under `key`.
///
/// The kernel may answer with a bare address string or with `{"address": "..."}`.
///
/// # Errors
///
/// Transport errors are propagated unchanged. A reply without an address yields
/// [`QueryError::MissingField`]; an address that is not valid bech32 yields
/// [`QueryError::InvalidResponse`].
pub async fn resolve_system_address(
    client: &dyn ContractQuerier,
    kernel: &ContractAddress,
    key: SystemKey,
) -> Result<ContractAddress, QueryError> {
    let msg = AdoQuery::from(KernelQuery::key_address(key)).to_json()?;
    let reply = client.query_smart(kernel, &msg).await?;

    let address = match &reply {
        Value::String(address) => address.as_str(),
        Value::Object(fields) => fields
            .get("address")
            .and_then(Value::as_str)
            .ok_or_else(|| QueryError::missing_field("address", format!("kernel key_address({key}) reply")))?,
        _ => return Err(QueryError::missing_field("address", format!("kernel key_address({key}) reply"))),
    };

    let resolved = ContractAddress::parse(address).map_err(|_| {
        QueryError::InvalidResponse(format!("kernel returned an invalid address for {key}: {address:?}"))
    })?;

    tracing::info!(kernel = %kernel, key = %key, address = %resolved, "resolved system address");
    Ok(resolved)
}

/// Asks the registry at `registry` for the code id of `component`.
///
/// The registry may answer with a bare integer or with `{"code_id": n}`.
///
/// # Errors
///
/// Transport errors are propagated unchanged. A reply without a code id yields
/// [`QueryError::MissingField`].
pub async fn query_code_id(
    client: &dyn ContractQuerier,
    registry: &ContractAddress,
    component: &AdoVersion,
) -> Result<u64, QueryError> {
    let msg = AdoQuery::from(AdodbQuery::code_id(component)).to_json()?;
    let reply = client.query_smart(registry, &msg).await?;

    let code_id = match &reply {
        Value::Object(fields) => fields.get("code_id").and_then(Value::as_u64),
        other => other.as_u64(),
    }
    .ok_or_else(|| QueryError::missing_field("code_id", format!("adodb code_id({component}) reply")))?;

    tracing::info!(registry = %registry, component = %component, code_id, "resolved code id");
    Ok(code_id)
}

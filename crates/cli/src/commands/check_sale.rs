//! Marketplace sale health check.
//!
//! Walks the same path a storefront does to render a listing: the marketplace's sale record
//! for a token, the token's metadata URI from its cw721 contract, and the metadata document
//! itself from an IPFS gateway.

use andromeda_core::QueryEngine;
use serde_json::{json, Value};
use std::time::Duration;

use super::utils::{print_info, print_json, print_step, print_success, CliError, CliResult};

pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

pub struct CheckSaleOptions {
    pub chain: String,
    pub marketplace: String,
    pub nft_contract: String,
    pub token_id: String,
    pub gateway: String,
    pub timeout_secs: u64,
}

pub async fn check_sale(engine: &QueryEngine, options: &CheckSaleOptions) -> CliResult<()> {
    print_step("Querying marketplace for sale info...");
    let sales = engine
        .query(
            &options.chain,
            &options.marketplace,
            "marketplace.sales",
            &json!({ "nft_contract_address": options.nft_contract, "token_id": options.token_id }),
        )
        .await?;
    let sale = first_sale(&sales).ok_or_else(|| {
        CliError::General(format!("no sale found for token {} on {}", options.token_id, options.marketplace))
    })?;
    print_success(&format!("Found sale info for token {}", options.token_id));
    print_json(sale)?;

    print_step("Querying cw721 contract for metadata URI...");
    let nft_info = engine
        .query(&options.chain, &options.nft_contract, "token.nft_info", &json!({ "token_id": options.token_id }))
        .await?;
    let token_uri = nft_info
        .get("token_uri")
        .and_then(Value::as_str)
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| CliError::General("nft_info reply has no token_uri".to_string()))?;
    print_success(&format!("Found token URI: {token_uri}"));

    print_step("Fetching metadata from IPFS gateway...");
    let metadata_url = gateway_url(token_uri, &options.gateway);
    if metadata_url != token_uri {
        print_info(&format!("Converted IPFS URI to gateway URL: {metadata_url}"));
    }

    let metadata: Value = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_secs))
        .build()?
        .get(&metadata_url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    print_success("Fetched and parsed metadata.");
    print_json(&metadata)?;

    println!("\nHealth check complete.");
    Ok(())
}

/// The marketplace answers with either `{"sales": [...]}` or a bare list.
fn first_sale(reply: &Value) -> Option<&Value> {
    reply.get("sales").unwrap_or(reply).as_array().and_then(|sales| sales.first())
}

/// Rewrites `ipfs://<cid>/<path>` onto an HTTP gateway. Other URIs pass through unchanged.
fn gateway_url(token_uri: &str, gateway: &str) -> String {
    match token_uri.strip_prefix("ipfs://") {
        Some(path) => format!("{}/{}", gateway.trim_end_matches('/'), path.trim_start_matches("ipfs/")),
        None => token_uri.to_string(),
    }
}

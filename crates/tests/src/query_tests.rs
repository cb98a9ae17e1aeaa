//! Contract Query Integration Tests
//!
//! Covers built and raw queries end to end, and checks that malformed input is rejected
//! before anything reaches the network.

use crate::mock_infrastructure::{address, kernel_address, lcd_engine, rpc_engine, ChainNodeMock, CHAIN_ID};
use andromeda_core::{messages::{AdoQuery, CrowdfundQuery}, ErrorKind, QueryError, SystemKey};
use serde_json::json;

#[tokio::test]
async fn test_built_query_over_rpc() {
    let crowdfund = address(10);
    let summary = json!({ "current_capital": "1500000", "current_stage": "ongoing" });

    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&crowdfund, "campaign_summary", &summary, 1).await;

    let engine = rpc_engine(node.url());

    let reply = engine.query(CHAIN_ID, &crowdfund, "crowdfund.campaign_summary", &json!(null)).await.unwrap();
    assert_eq!(reply, summary);

    node.assert_all().await;
}

#[tokio::test]
async fn test_typed_query_over_lcd() {
    let crowdfund = address(11);
    let tiers = json!({ "tiers": [{ "level": "1", "label": "early", "price": "100" }] });

    let mut node = ChainNodeMock::new().await;
    node.lcd_smart_query(&crowdfund, &tiers, 1).await;

    let engine = lcd_engine(node.url());

    let query: AdoQuery = CrowdfundQuery::tiers(None, Some(10)).unwrap().into();
    let reply = engine.query_contract(CHAIN_ID, &crowdfund, &query).await.unwrap();
    assert_eq!(reply["tiers"][0]["label"], "early");

    node.assert_all().await;
}

#[tokio::test]
async fn test_marketplace_sales_query() {
    let marketplace = address(12);
    let nft = address(13);

    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&marketplace, "sales", &json!({ "sale_ids": ["4"] }), 1).await;

    let engine = rpc_engine(node.url());

    let reply = engine
        .query(CHAIN_ID, &marketplace, "marketplace.sales", &json!({ "nft_contract_address": nft, "token_id": "7" }))
        .await
        .unwrap();
    assert_eq!(reply["sale_ids"][0], "4");

    node.assert_all().await;
}

#[tokio::test]
async fn test_raw_query_is_sent_verbatim() {
    let contract = address(14);

    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&contract, "get_custom_state", &json!({ "value": 1 }), 1).await;

    let engine = rpc_engine(node.url());

    let reply = engine.query_raw(CHAIN_ID, &contract, &json!({ "get_custom_state": {} })).await.unwrap();
    assert_eq!(reply["value"], 1);

    node.assert_all().await;
}

#[tokio::test]
async fn test_invalid_address_never_reaches_the_node() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_status(500, 0).await;

    let engine = rpc_engine(node.url());

    let err = engine.query_raw(CHAIN_ID, "not-an-address", &json!({ "state": {} })).await.unwrap_err();
    assert!(matches!(err, QueryError::InvalidAddress(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);

    node.assert_all().await;
}

#[tokio::test]
async fn test_invalid_params_never_reach_the_node() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_status(500, 0).await;

    let engine = rpc_engine(node.url());
    let contract = address(15);

    let err = engine.query(CHAIN_ID, &contract, "crowdfund.tiers", &json!({ "limit": 0 })).await.unwrap_err();
    assert!(matches!(err, QueryError::InvalidMessage(_)));

    let err = engine.query(CHAIN_ID, &contract, "crowdfund.refund", &json!({})).await.unwrap_err();
    assert!(matches!(err, QueryError::InvalidMessage(_)));

    let err = engine.get_code_id(CHAIN_ID, "crowdfund").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    node.assert_all().await;
}

#[tokio::test]
async fn test_unknown_chain() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_status(500, 0).await;

    let engine = rpc_engine(node.url());

    let err = engine.get_code_id("osmo-test-5", "crowdfund@2.0.3").await.unwrap_err();
    assert_eq!(err, QueryError::ChainNotConfigured("osmo-test-5".to_string()));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    node.assert_all().await;
}

#[tokio::test]
async fn test_malformed_kernel_reply_is_a_decode_error() {
    let mut node = ChainNodeMock::new().await;
    node.lcd_smart_query(&kernel_address(), &json!(null), 1).await;

    let engine = lcd_engine(node.url());

    let err = engine.get_code_id(CHAIN_ID, "crowdfund@2.0.3").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);

    node.assert_all().await;
}

#[tokio::test]
async fn test_kernel_reply_with_invalid_address() {
    let mut node = ChainNodeMock::new().await;
    node.lcd_smart_query(&kernel_address(), &json!({ "address": "cosmos1nope" }), 1).await;

    let engine = lcd_engine(node.url());

    let err = engine.resolve_system_address(CHAIN_ID, SystemKey::Vfs).await.unwrap_err();
    assert!(matches!(err, QueryError::InvalidResponse(_)));

    node.assert_all().await;
}

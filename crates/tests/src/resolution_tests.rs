//! Resolution Integration Tests
//!
//! Drives kernel and code registry lookups through a real HTTP stack against a mock node
//! and counts the requests each operation causes.

use crate::mock_infrastructure::{kernel_address, registry_address, rpc_engine, ChainNodeMock, CHAIN_ID};
use andromeda_core::{ErrorKind, QueryError, SystemKey};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_code_id_resolves_through_kernel_and_registry() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!(registry_address()), 1).await;
    node.rpc_smart_query(&registry_address(), "code_id", &json!(42), 1).await;

    let engine = rpc_engine(node.url());

    let code_id = engine.get_code_id(CHAIN_ID, "crowdfund@2.0.3").await.unwrap();
    assert_eq!(code_id, 42);

    node.assert_all().await;
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!(registry_address()), 1).await;
    node.rpc_smart_query(&registry_address(), "code_id", &json!({ "code_id": 42 }), 1).await;

    let engine = rpc_engine(node.url());

    assert_eq!(engine.get_code_id(CHAIN_ID, "crowdfund@2.0.3").await.unwrap(), 42);
    assert_eq!(engine.get_code_id(CHAIN_ID, "crowdfund@2.0.3").await.unwrap(), 42);

    let stats = engine.code_id_cache().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);

    // Exactly one request per stage across both calls
    node.assert_all().await;
}

#[tokio::test]
async fn test_concurrent_lookups_share_one_fetch() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!(registry_address()), 1).await;
    node.rpc_smart_query(&registry_address(), "code_id", &json!(7), 1).await;

    let engine = Arc::new(rpc_engine(node.url()));

    let lookups = (0..8).map(|_| {
        let engine = Arc::clone(&engine);
        async move { engine.get_code_id(CHAIN_ID, "marketplace@1.1.0").await }
    });

    for result in join_all(lookups).await {
        assert_eq!(result.unwrap(), 7);
    }

    node.assert_all().await;
}

#[tokio::test]
async fn test_distinct_versions_are_cached_separately() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!(registry_address()), 2).await;
    node.rpc_smart_query(&registry_address(), "code_id", &json!(11), 2).await;

    let engine = rpc_engine(node.url());

    engine.get_code_id(CHAIN_ID, "crowdfund@2.0.3").await.unwrap();
    engine.get_code_id(CHAIN_ID, "crowdfund@2.0.4").await.unwrap();

    assert_eq!(engine.code_id_cache().len(), 2);
    node.assert_all().await;
}

#[tokio::test]
async fn test_missing_registry_address_is_a_decode_error() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!({}), 1).await;

    let engine = rpc_engine(node.url());

    let err = engine.get_code_id(CHAIN_ID, "crowdfund@2.0.3").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(matches!(err, QueryError::MissingField { .. }));

    node.assert_all().await;
}

#[tokio::test]
async fn test_missing_registry_address_is_shared_by_concurrent_callers() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!({}), 1).await;
    node.rpc_smart_query(&registry_address(), "code_id", &json!(42), 0).await;

    let engine = rpc_engine(node.url());

    let (first, second) = tokio::join!(
        engine.get_code_id(CHAIN_ID, "crowdfund@2.2.1-b.5"),
        engine.get_code_id(CHAIN_ID, "crowdfund@2.2.1-b.5"),
    );

    for err in [first.unwrap_err(), second.unwrap_err()] {
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(matches!(err, QueryError::MissingField { field: "address", .. }));
    }

    let stats = engine.code_id_cache().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.coalesced, 1);
    assert!(engine.code_id_cache().is_empty());

    node.assert_all().await;
}

#[tokio::test]
async fn test_contract_error_is_not_cached() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!(registry_address()), 2).await;
    node.rpc_contract_error(&registry_address(), "code_id", 5, "code id not found", 2).await;

    let engine = rpc_engine(node.url());

    for _ in 0..2 {
        let err = engine.get_code_id(CHAIN_ID, "crowdfund@9.9.9").await.unwrap_err();
        assert_eq!(err, QueryError::ContractError { code: 5, log: "code id not found".to_string() });
    }

    assert!(engine.code_id_cache().is_empty());
    assert_eq!(engine.code_id_cache().stats().failures, 2);
    node.assert_all().await;
}

#[tokio::test]
async fn test_system_address_resolution_is_cached() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!({ "address": registry_address() }), 1)
        .await;

    let engine = rpc_engine(node.url());

    for _ in 0..3 {
        let address = engine.resolve_system_address(CHAIN_ID, SystemKey::Adodb).await.unwrap();
        assert_eq!(address.as_str(), registry_address());
    }

    assert_eq!(engine.system_address_stats().hits, 2);
    node.assert_all().await;
}

#[tokio::test]
async fn test_clear_caches_forces_refetch() {
    let mut node = ChainNodeMock::new().await;
    node.rpc_smart_query(&kernel_address(), "key_address", &json!(registry_address()), 2).await;
    node.rpc_smart_query(&registry_address(), "code_id", &json!(3), 2).await;

    let engine = rpc_engine(node.url());

    engine.get_code_id(CHAIN_ID, "splitter@1.0.0").await.unwrap();
    engine.clear_caches();
    engine.get_code_id(CHAIN_ID, "splitter@1.0.0").await.unwrap();

    node.assert_all().await;
}

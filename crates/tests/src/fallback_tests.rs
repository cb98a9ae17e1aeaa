//! Transport Fallback Integration Tests
//!
//! Two mock nodes stand in for the RPC and LCD endpoints of one chain so each test can
//! assert which transport served a request and which was never touched.

use crate::mock_infrastructure::{chain_config, engine, kernel_address, registry_address, ChainNodeMock, CHAIN_ID};
use andromeda_core::{QueryError, TransportKind};
use serde_json::json;

fn key_address_query() -> serde_json::Value {
    json!({ "key_address": { "key": "adodb" } })
}

#[tokio::test]
async fn test_rpc_http_failure_falls_back_to_lcd() {
    let mut rpc = ChainNodeMock::new().await;
    rpc.rpc_status(503, 1).await;

    let mut lcd = ChainNodeMock::new().await;
    lcd.lcd_smart_query(&kernel_address(), &json!(registry_address()), 1).await;

    let engine = engine(vec![chain_config(Some(rpc.url()), Some(lcd.url()), TransportKind::Rpc)]);

    let reply = engine.query_raw(CHAIN_ID, &kernel_address(), &key_address_query()).await.unwrap();
    assert_eq!(reply, json!(registry_address()));

    rpc.assert_all().await;
    lcd.assert_all().await;
}

#[tokio::test]
async fn test_unreachable_rpc_falls_back_to_lcd() {
    let mut lcd = ChainNodeMock::new().await;
    lcd.lcd_smart_query(&kernel_address(), &json!(registry_address()), 1).await;

    // Nothing listens on port 1
    let engine = engine(vec![chain_config(
        Some("http://127.0.0.1:1".to_string()),
        Some(lcd.url()),
        TransportKind::Rpc,
    )]);

    let reply = engine.query_raw(CHAIN_ID, &kernel_address(), &key_address_query()).await.unwrap();
    assert_eq!(reply, json!(registry_address()));

    lcd.assert_all().await;
}

#[tokio::test]
async fn test_contract_error_does_not_fall_back() {
    let mut rpc = ChainNodeMock::new().await;
    rpc.rpc_contract_error(&kernel_address(), "key_address", 18, "unknown key", 1).await;

    let mut lcd = ChainNodeMock::new().await;
    lcd.lcd_smart_query(&kernel_address(), &json!(registry_address()), 0).await;

    let engine = engine(vec![chain_config(Some(rpc.url()), Some(lcd.url()), TransportKind::Rpc)]);

    let err = engine.query_raw(CHAIN_ID, &kernel_address(), &key_address_query()).await.unwrap_err();
    assert_eq!(err, QueryError::ContractError { code: 18, log: "unknown key".to_string() });

    rpc.assert_all().await;
    lcd.assert_all().await;
}

#[tokio::test]
async fn test_preferred_lcd_is_tried_first() {
    let mut rpc = ChainNodeMock::new().await;
    rpc.rpc_status(500, 0).await;

    let mut lcd = ChainNodeMock::new().await;
    lcd.lcd_smart_query(&kernel_address(), &json!({ "address": registry_address() }), 1).await;

    let engine = engine(vec![chain_config(Some(rpc.url()), Some(lcd.url()), TransportKind::Lcd)]);
    assert_eq!(engine.pool().get_client(CHAIN_ID).unwrap().transports(), vec![
        TransportKind::Lcd,
        TransportKind::Rpc
    ]);

    let reply = engine.query_raw(CHAIN_ID, &kernel_address(), &key_address_query()).await.unwrap();
    assert_eq!(reply["address"], json!(registry_address()));

    rpc.assert_all().await;
    lcd.assert_all().await;
}

#[tokio::test]
async fn test_lcd_gateway_error_is_a_contract_error() {
    let mut rpc = ChainNodeMock::new().await;
    rpc.rpc_status(500, 0).await;

    let mut lcd = ChainNodeMock::new().await;
    lcd.lcd_contract_error(&kernel_address(), 2, "query wasm contract failed: unknown variant", 1).await;

    let engine = engine(vec![chain_config(Some(rpc.url()), Some(lcd.url()), TransportKind::Lcd)]);

    let err = engine.query_raw(CHAIN_ID, &kernel_address(), &key_address_query()).await.unwrap_err();
    assert!(matches!(err, QueryError::ContractError { code: 2, .. }));

    rpc.assert_all().await;
    lcd.assert_all().await;
}

#[tokio::test]
async fn test_last_transport_error_is_returned() {
    let mut rpc = ChainNodeMock::new().await;
    rpc.rpc_status(503, 1).await;

    let mut lcd = ChainNodeMock::new().await;
    lcd.lcd_contract_error(&kernel_address(), 5, "not found", 1).await;

    let engine = engine(vec![chain_config(Some(rpc.url()), Some(lcd.url()), TransportKind::Rpc)]);

    let err = engine.query_raw(CHAIN_ID, &kernel_address(), &key_address_query()).await.unwrap_err();
    assert!(matches!(err, QueryError::ContractError { code: 5, .. }));

    rpc.assert_all().await;
    lcd.assert_all().await;
}

#[tokio::test]
async fn test_code_id_resolution_survives_rpc_outage() {
    let mut rpc = ChainNodeMock::new().await;
    rpc.rpc_status(502, 2).await;

    let mut lcd = ChainNodeMock::new().await;
    lcd.lcd_smart_query(&kernel_address(), &json!(registry_address()), 1).await;
    lcd.lcd_smart_query(&registry_address(), &json!(99), 1).await;

    let engine = engine(vec![chain_config(Some(rpc.url()), Some(lcd.url()), TransportKind::Rpc)]);

    assert_eq!(engine.get_code_id(CHAIN_ID, "cw721@2.1.0").await.unwrap(), 99);

    rpc.assert_all().await;
    lcd.assert_all().await;
}

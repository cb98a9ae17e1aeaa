//! Test Helper Functions and Utilities
//!
//! Common helpers for building addresses, chain configurations and engines.

use andromeda_core::{
    config::{AppConfig, ChainConfig, ClientConfig},
    QueryEngine, TransportKind,
};
use bech32::{Bech32, Hrp};

pub const CHAIN_ID: &str = "galileo-4";

/// A valid `andr1…` address derived from `seed`.
#[must_use]
pub fn address(seed: u8) -> String {
    let hrp = Hrp::parse("andr").expect("valid hrp");
    bech32::encode::<Bech32>(hrp, &[seed; 32]).expect("encodable")
}

#[must_use]
pub fn kernel_address() -> String {
    address(1)
}

#[must_use]
pub fn registry_address() -> String {
    address(2)
}

/// Chain entry with the given endpoints, rooted at [`kernel_address`].
#[must_use]
pub fn chain_config(rpc_url: Option<String>, lcd_url: Option<String>, preferred: TransportKind) -> ChainConfig {
    ChainConfig {
        chain_identifier: CHAIN_ID.to_string(),
        kernel_address: kernel_address(),
        rpc_url,
        lcd_url,
        preferred_transport: preferred,
    }
}

/// Engine over `chains` with a short request timeout.
///
/// # Panics
///
/// Panics if the configuration is invalid.
#[must_use]
pub fn engine(chains: Vec<ChainConfig>) -> QueryEngine {
    let config = AppConfig {
        client: ClientConfig { request_timeout_seconds: 5, ..ClientConfig::default() },
        chains,
        ..AppConfig::default()
    };
    QueryEngine::from_config(&config).expect("valid test configuration")
}

/// Engine with a single RPC-only chain.
#[must_use]
pub fn rpc_engine(rpc_url: String) -> QueryEngine {
    engine(vec![chain_config(Some(rpc_url), None, TransportKind::Rpc)])
}

/// Engine with a single LCD-only chain.
#[must_use]
pub fn lcd_engine(lcd_url: String) -> QueryEngine {
    engine(vec![chain_config(None, Some(lcd_url), TransportKind::Lcd)])
}

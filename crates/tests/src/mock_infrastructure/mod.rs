//! Mock Infrastructure for Testing Andromeda Resolution
//!
//! This module provides reusable mock types for testing chain interactions without
//! requiring a live node.
//!
//! ## Components
//!
//! - `ChainNodeMock`: Wraps mockito to answer CosmWasm smart queries over RPC and LCD
//! - Test helpers for addresses, chain configs and engines
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::{ChainNodeMock, kernel_address, registry_address, rpc_engine};
//!
//! let mut node = ChainNodeMock::new().await;
//! node.rpc_smart_query(&kernel_address(), "key_address", &json!(registry_address()), 1).await;
//!
//! let engine = rpc_engine(node.url());
//! ```

pub mod node_mock;
pub mod test_helpers;

pub use node_mock::ChainNodeMock;
pub use test_helpers::*;

//! Integration Tests for Andromeda Core
//!
//! This crate contains the following test modules:
//!
//! - `resolution_tests`: Kernel address and code id resolution, including caching behavior
//! - `fallback_tests`: RPC/LCD transport fallback in the chain client
//! - `query_tests`: Contract queries and input validation before network access
//! - `mock_infrastructure`: Reusable mock chain node and helpers
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```
//!
//! Every test runs against a local mockito server; no live chain is required.

#[cfg(test)]
mod resolution_tests;

#[cfg(test)]
mod fallback_tests;

#[cfg(test)]
mod query_tests;

/// Mock infrastructure for testing
pub mod mock_infrastructure;

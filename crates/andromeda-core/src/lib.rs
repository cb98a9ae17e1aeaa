//! # Andromeda Core
//!
//! Chain resolution and caching for Andromeda Protocol deployments on Cosmos chains.
//!
//! This crate provides:
//!
//! - **[`chain`]**: Smart-contract query clients over Tendermint RPC and the Cosmos REST (LCD)
//!   gateway, behind the [`chain::ContractQuerier`] trait.
//!
//! - **[`pool`]**: One client per configured chain, with transparent fallback from the
//!   preferred transport to the other on transport failures.
//!
//! - **[`resolver`]**: Kernel `key_address` lookups and registry `code_id` lookups.
//!
//! - **[`cache`]**: TTL + LRU resolution cache that coalesces concurrent lookups and never
//!   caches failures.
//!
//! - **[`messages`]**: Typed, validated query and execute messages for the kernel, the ADO
//!   registry, crowdfund, marketplace and token contracts.
//!
//! - **[`engine`]**: [`QueryEngine`], the facade tying the above together.
//!
//! ## Resolution Flow
//!
//! ```text
//! get_code_id(chain, "crowdfund@2.0.3")
//!       │
//!       ▼
//! ┌─────────────┐
//! │ Validation  │ ─── Invalid ──► ValidationError / ConfigurationError
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ Cache Check │ ─── Hit ──► code id
//! └──────┬──────┘
//!        │ Miss (or join in-flight fetch)
//!        ▼
//! ┌──────────────────────────┐
//! │ kernel: key_address      │ ──► registry address
//! │ adodb:  code_id          │ ──► code id
//! └────────────┬─────────────┘
//!              │ via ChainClient (RPC ⇄ LCD fallback)
//!              ▼
//!        Cache Insert (success only)
//! ```

pub mod address;
pub mod cache;
pub mod chain;
pub mod config;
pub mod engine;
pub mod errors;
pub mod messages;
pub mod pool;
pub mod resolver;
pub mod types;

pub use address::ContractAddress;
pub use engine::QueryEngine;
pub use errors::{ErrorKind, QueryError};
pub use types::{AdoVersion, ChainId, SystemKey, TransportKind};

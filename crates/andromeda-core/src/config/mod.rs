//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `ANDROMEDA_CONFIG` env var
//! 3. **Environment variables**: `ANDROMEDA__*` env vars override specific fields
//!
//! Configuration is read once at process start and is immutable afterwards.
//!
//! # Example
//!
//! ```toml
//! [client]
//! request_timeout_seconds = 30
//!
//! [cache]
//! ttl_seconds = 300
//! capacity = 5
//!
//! [[chains]]
//! chain_identifier = "andromeda-testnet"
//! kernel_address = "andr1..."
//! rpc_url = "https://rpc.testnet.andromedaprotocol.io"
//! lcd_url = "https://api.testnet.andromedaprotocol.io"
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path, time::Duration};

use crate::{address::is_valid_address, cache::ResolutionCacheConfig, chain::HttpClientConfig, types::TransportKind};

/// Per-chain node endpoints and kernel entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Identifier callers use to select this chain (e.g. `"andromeda-testnet"`).
    pub chain_identifier: String,

    /// Address of the kernel contract; the root of all system-address discovery.
    pub kernel_address: String,

    /// Tendermint RPC endpoint.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Cosmos REST (LCD) endpoint.
    #[serde(default)]
    pub lcd_url: Option<String>,

    /// Transport tried first when both are configured. Defaults to `rpc`.
    #[serde(default)]
    pub preferred_transport: TransportKind,
}

/// HTTP client settings shared by all chains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Per-request timeout in seconds. Defaults to `30`.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// TCP connect timeout in seconds. Defaults to `5`.
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Maximum concurrent node requests. Defaults to `100`.
    #[serde(default = "default_concurrent_limit")]
    pub concurrent_limit: usize,
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    5
}

fn default_concurrent_limit() -> usize {
    100
}

/// Resolution cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds. Defaults to `300`.
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Maximum number of entries per cache. Defaults to `5`.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

fn default_cache_capacity() -> usize {
    5
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,
}

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment. Defaults to `"development"`.
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Configured chains. At least one is required.
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            concurrent_limit: default_concurrent_limit(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: default_cache_ttl_seconds(), capacity: default_cache_capacity() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            client: ClientConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            chains: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// Use `__` as a separator for nested fields (e.g., `ANDROMEDA__CACHE__TTL_SECONDS=60`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("environment", "development")?
            .set_default("client.request_timeout_seconds", 30)?
            .set_default("client.connect_timeout_seconds", 5)?
            .set_default("client.concurrent_limit", 100)?
            .set_default("cache.ttl_seconds", 300)?
            .set_default("cache.capacity", 5)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("ANDROMEDA").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml`, overridable via `ANDROMEDA_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ANDROMEDA_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.chains.is_empty() {
            return Err("No chains configured".to_string());
        }

        let mut seen = HashSet::new();
        for chain in &self.chains {
            let id = chain.chain_identifier.trim();
            if id.is_empty() {
                return Err("Empty chain identifier".to_string());
            }
            if !seen.insert(id) {
                return Err(format!("Duplicate chain identifier: {id}"));
            }
            if chain.kernel_address.trim().is_empty() {
                return Err(format!("Missing kernel address for chain: {id}"));
            }
            if !is_valid_address(chain.kernel_address.trim()) {
                return Err(format!("Invalid kernel address for chain {id}: {}", chain.kernel_address));
            }
            if chain.rpc_url.is_none() && chain.lcd_url.is_none() {
                return Err(format!("Chain {id} needs an rpc_url or an lcd_url"));
            }
            for endpoint in chain.rpc_url.iter().chain(chain.lcd_url.iter()) {
                let parsed = url::Url::parse(endpoint)
                    .map_err(|e| format!("Invalid endpoint URL for chain {id}: {endpoint} ({e})"))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(format!("Endpoint URL for chain {id} must be http(s): {endpoint}"));
                }
            }
        }

        if self.cache.ttl_seconds == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }

        if self.cache.capacity == 0 {
            return Err("Cache capacity must be greater than 0".to_string());
        }

        if self.client.request_timeout_seconds == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.client.connect_timeout_seconds == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        if self.client.concurrent_limit == 0 {
            return Err("Concurrent limit must be greater than 0".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }

    /// Returns the per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.client.request_timeout_seconds)
    }

    #[must_use]
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            concurrent_limit: self.client.concurrent_limit,
            connect_timeout: Duration::from_secs(self.client.connect_timeout_seconds),
            ..HttpClientConfig::default()
        }
    }

    #[must_use]
    pub fn resolution_cache_config(&self) -> ResolutionCacheConfig {
        ResolutionCacheConfig {
            ttl: Duration::from_secs(self.cache.ttl_seconds),
            capacity: self.cache.capacity,
        }
    }

    /// Looks up a chain by identifier.
    #[must_use]
    pub fn chain(&self, chain_identifier: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain_identifier == chain_identifier)
    }
}

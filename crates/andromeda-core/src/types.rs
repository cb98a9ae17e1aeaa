use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt, str::FromStr, sync::Arc};

use crate::errors::QueryError;

/// Identifier of a configured chain (e.g. `andromeda-testnet`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(Arc<str>);

impl ChainId {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for ChainId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Well-known system roles resolvable through the kernel contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemKey {
    /// Code registry mapping `name@version` to code ids.
    Adodb,
    /// Virtual filesystem.
    Vfs,
    Economics,
    IbcRegistry,
}

impl SystemKey {
    pub const ALL: [Self; 4] = [Self::Adodb, Self::Vfs, Self::Economics, Self::IbcRegistry];

    /// The key string stored by the kernel contract.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adodb => "adodb",
            Self::Vfs => "vfs",
            Self::Economics => "economics",
            Self::IbcRegistry => "ibc-registry",
        }
    }
}

impl fmt::Display for SystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| QueryError::InvalidMessage(format!("unknown system key: {s}")))
    }
}

/// A component name pinned to a version, e.g. `crowdfund@2.2.1-b.5`.
///
/// This is the key the code registry uses to look up code ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdoVersion {
    name: Arc<str>,
    version: semver::Version,
}

impl AdoVersion {
    /// Parses `name@version`.
    ///
    /// The name must be non-empty and consist of lowercase ASCII letters, digits, `-` or `_`;
    /// the version must be valid semver.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] if either half is malformed.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let (name, version) = input
            .trim()
            .split_once('@')
            .ok_or_else(|| QueryError::InvalidMessage(format!("expected name@version: {input}")))?;

        let valid_name = !name.is_empty() &&
            name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid_name {
            return Err(QueryError::InvalidMessage(format!("invalid component name: {name}")));
        }

        let version = semver::Version::parse(version).map_err(|e| {
            QueryError::InvalidMessage(format!("invalid component version {version}: {e}"))
        })?;

        Ok(Self { name: Arc::from(name), version })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &semver::Version {
        &self.version
    }
}

impl fmt::Display for AdoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

impl FromStr for AdoVersion {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Wire protocol used to reach a chain node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Tendermint JSON-RPC `abci_query`.
    #[default]
    Rpc,
    /// Cosmos REST gateway.
    Lcd,
}

impl TransportKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rpc => "rpc",
            Self::Lcd => "lcd",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

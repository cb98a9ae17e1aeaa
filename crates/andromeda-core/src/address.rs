//! Bech32 contract address validation.
//!
//! Every address handed to a chain client must be a [`ContractAddress`], which can only be
//! constructed from a string that decodes under the bech32 scheme. Invalid input is rejected
//! here, before any request leaves the process.

use bech32::{primitives::decode::CheckedHrpstring, Bech32};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use crate::errors::QueryError;

/// Longest string BIP-173 allows.
pub const MAX_ADDRESS_LENGTH: usize = 90;

/// Returns `true` iff `address` decodes under the bech32 scheme.
///
/// Bech32m checksums, mixed case, surrounding whitespace and strings longer than
/// [`MAX_ADDRESS_LENGTH`] are rejected.
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    address.len() <= MAX_ADDRESS_LENGTH && CheckedHrpstring::new::<Bech32>(address).is_ok()
}

/// A bech32-encoded contract address that has passed checksum validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractAddress(Arc<str>);

impl ContractAddress {
    /// Validates and wraps `address`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidAddress`] if [`is_valid_address`] rejects the string.
    pub fn parse(address: &str) -> Result<Self, QueryError> {
        if !is_valid_address(address) {
            return Err(QueryError::InvalidAddress(address.to_string()));
        }
        Ok(Self(Arc::from(address)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable part of the address (e.g. `andr`).
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.rsplit_once('1').map_or("", |(hrp, _)| hrp)
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContractAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContractAddress {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for ContractAddress {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ContractAddress> for String {
    fn from(value: ContractAddress) -> Self {
        value.0.to_string()
    }
}

use serde::Serialize;

use crate::types::SystemKey;

/// Read queries understood by the kernel contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelQuery {
    /// `{"key_address":{"key":"adodb"}}`
    KeyAddress { key: String },
}

impl KernelQuery {
    #[must_use]
    pub fn key_address(key: SystemKey) -> Self {
        Self::KeyAddress { key: key.as_str().to_string() }
    }
}

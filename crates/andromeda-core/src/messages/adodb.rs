use serde::Serialize;

use crate::types::AdoVersion;

/// Read queries understood by the ADO registry (`adodb`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdodbQuery {
    /// `{"code_id":{"key":"crowdfund@2.0.3"}}`
    CodeId { key: String },
}

impl AdodbQuery {
    #[must_use]
    pub fn code_id(component: &AdoVersion) -> Self {
        Self::CodeId { key: component.to_string() }
    }
}

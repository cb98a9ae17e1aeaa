use serde::Serialize;

use super::non_empty;
use crate::{address::ContractAddress, errors::QueryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketplaceQuery {
    /// Sales listed for one token of a cw721 collection.
    Sales { nft_contract_address: ContractAddress, token_id: String },
}

impl MarketplaceQuery {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] for an empty token id.
    pub fn sales(nft_contract: ContractAddress, token_id: &str) -> Result<Self, QueryError> {
        Ok(Self::Sales { nft_contract_address: nft_contract, token_id: non_empty("token_id", token_id)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketplaceExecute {
    Buy { nft_contract_address: ContractAddress, token_id: String },
}

impl MarketplaceExecute {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] for an empty token id.
    pub fn buy(nft_contract: ContractAddress, token_id: &str) -> Result<Self, QueryError> {
        Ok(Self::Buy { nft_contract_address: nft_contract, token_id: non_empty("token_id", token_id)? })
    }
}

//! cw721 (NFT) and cw20 (fungible) token messages.

use serde::Serialize;

use super::{non_empty, Uint128};
use crate::{address::ContractAddress, errors::QueryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenQuery {
    NftInfo { token_id: String },
    OwnerOf { token_id: String },
    TokenInfo {},
    Balance { address: ContractAddress },
}

impl TokenQuery {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] for an empty token id.
    pub fn nft_info(token_id: &str) -> Result<Self, QueryError> {
        Ok(Self::NftInfo { token_id: non_empty("token_id", token_id)? })
    }

    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] for an empty token id.
    pub fn owner_of(token_id: &str) -> Result<Self, QueryError> {
        Ok(Self::OwnerOf { token_id: non_empty("token_id", token_id)? })
    }

    #[must_use]
    pub fn token_info() -> Self {
        Self::TokenInfo {}
    }

    #[must_use]
    pub fn balance(address: ContractAddress) -> Self {
        Self::Balance { address }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenExecute {
    Transfer { recipient: ContractAddress, amount: Uint128 },
    TransferNft { recipient: ContractAddress, token_id: String },
}

impl TokenExecute {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] for a zero amount.
    pub fn transfer(recipient: ContractAddress, amount: Uint128) -> Result<Self, QueryError> {
        if amount.is_zero() {
            return Err(QueryError::InvalidMessage("transfer amount must be > 0".into()));
        }
        Ok(Self::Transfer { recipient, amount })
    }

    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] for an empty token id.
    pub fn transfer_nft(recipient: ContractAddress, token_id: &str) -> Result<Self, QueryError> {
        Ok(Self::TransferNft { recipient, token_id: non_empty("token_id", token_id)? })
    }
}

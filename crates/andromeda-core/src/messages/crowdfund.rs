use serde::Serialize;
use std::collections::HashSet;

use super::Uint128;
use crate::errors::QueryError;

/// Largest page size the crowdfund contract accepts for `tiers`.
pub const MAX_TIERS_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrowdfundQuery {
    CampaignSummary {},
    Tiers {
        #[serde(skip_serializing_if = "Option::is_none")]
        start_after: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
}

impl CrowdfundQuery {
    #[must_use]
    pub fn campaign_summary() -> Self {
        Self::CampaignSummary {}
    }

    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] if `limit` is zero or above [`MAX_TIERS_LIMIT`].
    pub fn tiers(start_after: Option<u64>, limit: Option<u32>) -> Result<Self, QueryError> {
        if let Some(limit) = limit {
            if limit == 0 || limit > MAX_TIERS_LIMIT {
                return Err(QueryError::InvalidMessage(format!(
                    "tiers limit must be between 1 and {MAX_TIERS_LIMIT}, got {limit}"
                )));
            }
        }
        Ok(Self::Tiers { start_after, limit })
    }
}

/// One line of a tier purchase: `amount` micro-units from tier `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierOrder {
    pub level: u64,
    pub amount: Uint128,
}

impl TierOrder {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] for a zero amount.
    pub fn new(level: u64, amount: Uint128) -> Result<Self, QueryError> {
        if amount.is_zero() {
            return Err(QueryError::InvalidMessage(format!("order for tier {level} has zero amount")));
        }
        Ok(Self { level, amount })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrowdfundExecute {
    PurchaseTiers { orders: Vec<TierOrder> },
}

impl CrowdfundExecute {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] if `orders` is empty or names a tier twice.
    pub fn purchase_tiers(orders: Vec<TierOrder>) -> Result<Self, QueryError> {
        if orders.is_empty() {
            return Err(QueryError::InvalidMessage("purchase_tiers needs at least one order".into()));
        }
        let mut levels = HashSet::with_capacity(orders.len());
        if let Some(duplicate) = orders.iter().find(|o| !levels.insert(o.level)) {
            return Err(QueryError::InvalidMessage(format!(
                "tier {} appears more than once",
                duplicate.level
            )));
        }
        Ok(Self::PurchaseTiers { orders })
    }
}

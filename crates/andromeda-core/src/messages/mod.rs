//! ADO message builders.
//!
//! Each ADO family has a query enum (and, where it accepts transactions, an execute enum)
//! whose serde representation is exactly the JSON the contract expects:
//!
//! ```text
//! KernelQuery::key_address(SystemKey::Adodb)   → {"key_address":{"key":"adodb"}}
//! AdodbQuery::code_id(&"crowdfund@2.0.3")      → {"code_id":{"key":"crowdfund@2.0.3"}}
//! MarketplaceQuery::sales(nft, "Cow01")        → {"sales":{"nft_contract_address":"andr1…","token_id":"Cow01"}}
//! ```
//!
//! Constructors validate their inputs, so a malformed message fails before it reaches the
//! network. Serialization is deterministic: the same builder and parameters always produce
//! the same bytes.
//!
//! [`build_query`] and [`build_execute`] select a builder from a `family.message` string and a
//! JSON parameter object, for callers that only have untyped input (the CLI, for example).

pub mod adodb;
pub mod crowdfund;
pub mod kernel;
pub mod marketplace;
pub mod token;

pub use adodb::AdodbQuery;
pub use crowdfund::{CrowdfundExecute, CrowdfundQuery, TierOrder};
pub use kernel::KernelQuery;
pub use marketplace::{MarketplaceExecute, MarketplaceQuery};
pub use token::{TokenExecute, TokenQuery};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::{
    address::ContractAddress,
    errors::QueryError,
    types::{AdoVersion, SystemKey},
};

/// Decimal places of the native micro-denomination (`uandr`).
pub const MICRO_UNIT_DECIMALS: u32 = 6;

/// 128-bit token amount, serialized as a decimal string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint128(u128);

impl Uint128 {
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn u128(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] unless `value` is a plain unsigned decimal.
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QueryError::InvalidMessage(format!("invalid amount: {value}")));
        }
        trimmed
            .parse()
            .map(Self)
            .map_err(|_| QueryError::InvalidMessage(format!("amount out of range: {value}")))
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Uint128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Converts whole tokens to micro-units (`whole × 10^decimals`).
///
/// # Errors
///
/// Returns [`QueryError::InvalidMessage`] on overflow.
pub fn to_micro_units(whole: u128, decimals: u32) -> Result<Uint128, QueryError> {
    10u128
        .checked_pow(decimals)
        .and_then(|scale| whole.checked_mul(scale))
        .map(Uint128)
        .ok_or_else(|| QueryError::InvalidMessage(format!("{whole} × 10^{decimals} overflows u128")))
}

pub(crate) fn non_empty(field: &str, value: &str) -> Result<String, QueryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QueryError::InvalidMessage(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// ADO family a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdoKind {
    Kernel,
    Adodb,
    Crowdfund,
    Marketplace,
    Token,
}

impl AdoKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kernel => "kernel",
            Self::Adodb => "adodb",
            Self::Crowdfund => "crowdfund",
            Self::Marketplace => "marketplace",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for AdoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any read query this crate can build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AdoQuery {
    Kernel(KernelQuery),
    Adodb(AdodbQuery),
    Crowdfund(CrowdfundQuery),
    Marketplace(MarketplaceQuery),
    Token(TokenQuery),
}

impl AdoQuery {
    #[must_use]
    pub fn kind(&self) -> AdoKind {
        match self {
            Self::Kernel(_) => AdoKind::Kernel,
            Self::Adodb(_) => AdoKind::Adodb,
            Self::Crowdfund(_) => AdoKind::Crowdfund,
            Self::Marketplace(_) => AdoKind::Marketplace,
            Self::Token(_) => AdoKind::Token,
        }
    }

    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] if serialization fails.
    pub fn to_json(&self) -> Result<Value, QueryError> {
        serde_json::to_value(self).map_err(|e| QueryError::InvalidMessage(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, QueryError> {
        serde_json::to_vec(self).map_err(|e| QueryError::InvalidMessage(e.to_string()))
    }
}

/// Any execute message this crate can build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AdoExecute {
    Crowdfund(CrowdfundExecute),
    Marketplace(MarketplaceExecute),
    Token(TokenExecute),
}

impl AdoExecute {
    #[must_use]
    pub fn kind(&self) -> AdoKind {
        match self {
            Self::Crowdfund(_) => AdoKind::Crowdfund,
            Self::Marketplace(_) => AdoKind::Marketplace,
            Self::Token(_) => AdoKind::Token,
        }
    }

    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] if serialization fails.
    pub fn to_json(&self) -> Result<Value, QueryError> {
        serde_json::to_value(self).map_err(|e| QueryError::InvalidMessage(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMessage`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, QueryError> {
        serde_json::to_vec(self).map_err(|e| QueryError::InvalidMessage(e.to_string()))
    }
}

macro_rules! impl_from {
    ($target:ident { $($variant:ident($source:ty)),* $(,)? }) => {
        $(
            impl From<$source> for $target {
                fn from(msg: $source) -> Self {
                    Self::$variant(msg)
                }
            }
        )*
    };
}

impl_from!(AdoQuery {
    Kernel(KernelQuery),
    Adodb(AdodbQuery),
    Crowdfund(CrowdfundQuery),
    Marketplace(MarketplaceQuery),
    Token(TokenQuery),
});

impl_from!(AdoExecute {
    Crowdfund(CrowdfundExecute),
    Marketplace(MarketplaceExecute),
    Token(TokenExecute),
});

/// Untyped builder parameters. `null` is treated as an empty object.
struct Params<'a> {
    kind: &'a str,
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Params<'a> {
    fn new(kind: &'a str, params: &'a Value) -> Result<Self, QueryError> {
        match params {
            Value::Null => Ok(Self { kind, fields: None }),
            Value::Object(fields) => Ok(Self { kind, fields: Some(fields) }),
            other => Err(QueryError::InvalidMessage(format!("{kind}: params must be an object, got {other}"))),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.and_then(|f| f.get(field)).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &str, expected: &str) -> QueryError {
        QueryError::InvalidMessage(format!("{}: {field} must be {expected}", self.kind))
    }

    fn required_str(&self, field: &str) -> Result<&'a str, QueryError> {
        self.get(field).and_then(Value::as_str).ok_or_else(|| self.invalid(field, "a string"))
    }

    fn optional_u64(&self, field: &str) -> Result<Option<u64>, QueryError> {
        self.get(field)
            .map(|v| v.as_u64().ok_or_else(|| self.invalid(field, "an unsigned integer")))
            .transpose()
    }

    fn required_u64(&self, field: &str) -> Result<u64, QueryError> {
        self.optional_u64(field)?.ok_or_else(|| self.invalid(field, "an unsigned integer"))
    }

    fn optional_u32(&self, field: &str) -> Result<Option<u32>, QueryError> {
        self.optional_u64(field)?
            .map(|v| u32::try_from(v).map_err(|_| self.invalid(field, "at most u32::MAX")))
            .transpose()
    }

    fn required_address(&self, field: &str) -> Result<ContractAddress, QueryError> {
        ContractAddress::parse(self.required_str(field)?)
    }

    /// Amounts may be given as a decimal string or a JSON integer.
    fn required_amount(&self, field: &str) -> Result<Uint128, QueryError> {
        match self.get(field) {
            Some(Value::String(s)) => Uint128::parse(s),
            Some(Value::Number(n)) => {
                n.as_u64().map(|v| Uint128::new(u128::from(v))).ok_or_else(|| self.invalid(field, "an unsigned integer"))
            }
            _ => Err(self.invalid(field, "an amount")),
        }
    }

    fn required_array(&self, field: &str) -> Result<&'a Vec<Value>, QueryError> {
        self.get(field).and_then(Value::as_array).ok_or_else(|| self.invalid(field, "an array"))
    }
}

/// Builds a read query from a `family.message` kind and JSON parameters.
///
/// Supported kinds: `kernel.key_address`, `adodb.code_id`, `crowdfund.campaign_summary`,
/// `crowdfund.tiers`, `marketplace.sales`, `token.nft_info`, `token.owner_of`,
/// `token.token_info`, `token.balance`.
///
/// # Errors
///
/// Returns [`QueryError::InvalidMessage`] for an unknown kind or missing/ill-typed parameters,
/// and [`QueryError::InvalidAddress`] for a malformed address parameter.
pub fn build_query(kind: &str, params: &Value) -> Result<AdoQuery, QueryError> {
    let p = Params::new(kind, params)?;

    let query: AdoQuery = match kind {
        "kernel.key_address" => KernelQuery::key_address(p.required_str("key")?.parse::<SystemKey>()?).into(),
        "adodb.code_id" => AdodbQuery::code_id(&AdoVersion::parse(p.required_str("key")?)?).into(),
        "crowdfund.campaign_summary" => CrowdfundQuery::campaign_summary().into(),
        "crowdfund.tiers" => CrowdfundQuery::tiers(p.optional_u64("start_after")?, p.optional_u32("limit")?)?.into(),
        "marketplace.sales" => {
            MarketplaceQuery::sales(p.required_address("nft_contract_address")?, p.required_str("token_id")?)?.into()
        }
        "token.nft_info" => TokenQuery::nft_info(p.required_str("token_id")?)?.into(),
        "token.owner_of" => TokenQuery::owner_of(p.required_str("token_id")?)?.into(),
        "token.token_info" => TokenQuery::token_info().into(),
        "token.balance" => TokenQuery::balance(p.required_address("address")?).into(),
        _ => return Err(QueryError::InvalidMessage(format!("unknown query kind: {kind}"))),
    };

    Ok(query)
}

/// Builds an execute message from a `family.message` kind and JSON parameters.
///
/// Supported kinds: `crowdfund.purchase_tiers`, `marketplace.buy`, `token.transfer`,
/// `token.transfer_nft`.
///
/// # Errors
///
/// Same as [`build_query`].
pub fn build_execute(kind: &str, params: &Value) -> Result<AdoExecute, QueryError> {
    let p = Params::new(kind, params)?;

    let msg: AdoExecute = match kind {
        "crowdfund.purchase_tiers" => {
            let orders = p
                .required_array("orders")?
                .iter()
                .map(|order| {
                    let order = Params::new(kind, order)?;
                    TierOrder::new(order.required_u64("level")?, order.required_amount("amount")?)
                })
                .collect::<Result<Vec<_>, _>>()?;
            CrowdfundExecute::purchase_tiers(orders)?.into()
        }
        "marketplace.buy" => {
            MarketplaceExecute::buy(p.required_address("nft_contract_address")?, p.required_str("token_id")?)?.into()
        }
        "token.transfer" => TokenExecute::transfer(p.required_address("recipient")?, p.required_amount("amount")?)?.into(),
        "token.transfer_nft" => {
            TokenExecute::transfer_nft(p.required_address("recipient")?, p.required_str("token_id")?)?.into()
        }
        _ => return Err(QueryError::InvalidMessage(format!("unknown execute kind: {kind}"))),
    };

    Ok(msg)
}

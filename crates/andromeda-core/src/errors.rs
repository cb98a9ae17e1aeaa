use thiserror::Error;

/// Coarse classification of a [`QueryError`].
///
/// Callers branch on the kind rather than on individual variants:
/// - Configuration errors are fatal to the request and never retried
/// - Validation errors are caught before any network call
/// - Transport errors are recoverable; retry is the caller's decision
/// - Decode errors mean the node answered with a shape we do not understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Transport,
    Decode,
}

impl ErrorKind {
    /// Returns a static string representation for log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::Transport => "transport",
            Self::Decode => "decode",
        }
    }
}

/// Errors returned by every operation in this crate.
///
/// The type is `Clone` so that a single failed fetch can be delivered to every
/// waiter coalesced onto it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryError {
    /// The chain identifier is not present in the loaded configuration.
    #[error("Chain not configured: {0}")]
    ChainNotConfigured(String),

    /// The chain is configured without a kernel contract address.
    #[error("Missing kernel address for chain: {0}")]
    MissingKernelAddress(String),

    /// Configuration could not be turned into clients.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A contract address failed bech32 validation.
    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),

    /// A message builder rejected its parameters.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Request exceeded the configured timeout duration.
    #[error("Request timeout")]
    Timeout,

    /// Failed to reach the node.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Non-2xx HTTP status from the node.
    ///
    /// First field is the HTTP status code, second is the (truncated) body.
    #[error("HTTP error: {0}")]
    HttpError(u16, String),

    /// JSON-RPC level error returned by the node.
    #[error("RPC error: {0}: {1}")]
    RpcError(i32, String),

    /// The node executed the query but the contract returned an error.
    #[error("Contract query failed (code {code}): {log}")]
    ContractError { code: u32, log: String },

    /// The task driving a shared fetch ended without producing a result.
    #[error("Fetch aborted: {0}")]
    FetchAborted(String),

    /// The response payload could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The response decoded but lacked a field we need.
    #[error("Missing field `{field}` in {context}")]
    MissingField { field: &'static str, context: String },
}

impl QueryError {
    /// Maps this error onto its [`ErrorKind`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChainNotConfigured(_) | Self::MissingKernelAddress(_) | Self::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            Self::InvalidAddress(_) | Self::InvalidMessage(_) => ErrorKind::Validation,
            Self::Timeout |
            Self::ConnectionFailed(_) |
            Self::HttpError(_, _) |
            Self::RpcError(_, _) |
            Self::ContractError { .. } |
            Self::FetchAborted(_) => ErrorKind::Transport,
            Self::InvalidResponse(_) | Self::MissingField { .. } => ErrorKind::Decode,
        }
    }

    /// Returns `true` if repeating the same request may succeed.
    ///
    /// A contract error is a transport-kind failure but is deterministic on-chain,
    /// so it is not retryable. 4xx statuses other than 429 are likewise permanent.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::ConnectionFailed(_) | Self::RpcError(_, _) | Self::FetchAborted(_) => {
                true
            }
            Self::HttpError(status, _) => (500..=599).contains(status) || *status == 429,
            _ => false,
        }
    }

    /// Returns `true` if another transport for the same chain should be tried.
    ///
    /// Only transport failures qualify; a contract error would be returned by
    /// every node alike.
    #[must_use]
    pub fn should_fall_back(&self) -> bool {
        self.kind() == ErrorKind::Transport && !matches!(self, Self::ContractError { .. })
    }

    pub(crate) fn missing_field(field: &'static str, context: impl Into<String>) -> Self {
        Self::MissingField { field, context: context.into() }
    }
}

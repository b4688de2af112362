//! Error types shared by the wallet console crates.

use thiserror::Error;

/// Failure to turn operator text into minor units.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a decimal amount")]
    Malformed(String),
    #[error("'{text}' has more than {decimals} fractional digits")]
    TooPrecise { text: String, decimals: u32 },
    #[error("'{0}' does not fit in 64-bit minor units")]
    Overflow(String),
    #[error("unsupported precision of {0} decimals")]
    UnsupportedPrecision(u32),
}

/// Failure reported by (or while talking to) the ledger client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid address '{0}'")]
    InvalidAddress(String),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
}

/// Token registry refresh failure. The previous snapshot stays in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry unavailable: {0}")]
    Unavailable(#[from] LedgerError),
    #[error("registry entry '{key}' is malformed: {reason}")]
    Malformed { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

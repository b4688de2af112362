// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DERO BRIDGE WALLET - CORE MODULE
//
// Asset amounts, the bridge token registry, the ledger-client capability
// consumed by the console, and console configuration.
// All financial arithmetic uses u64 minor units (no floating-point).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod amount;
pub mod config;
pub mod error;
pub mod ledger;
pub mod registry;

pub use amount::{format_amount, parse_amount};
pub use config::ConsoleConfig;
pub use error::{AmountError, ConfigError, LedgerError, RegistryError};
pub use ledger::{Address, ArgValue, AssetTransfer, CallArg, LedgerClient, TxId, VarValue};
pub use registry::{BalanceSheet, TokenEntry, TokenRegistry, TokenTable};

/// Ticker of the chain's base currency.
pub const NATIVE_SYMBOL: &str = "DERO";

/// 1 DERO = 100_000 atomic units (10^5 precision)
pub const NATIVE_DECIMALS: u32 = 5;

/// The native asset is addressed by the all-zero contract id.
pub const NATIVE_CONTRACT_ID: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Registry contract enumerating bridgeable tokens (`s:<SYMBOL>` -> contract id).
pub const DEFAULT_BRIDGE_REGISTRY: &str =
    "9bd7382be154ccfb981d1a0960f4c5b0227349980ec6446a2318d1401b8b738d";

/// Largest decimal precision a token may declare; 10^18 still fits u64 minor units.
pub const MAX_DECIMALS: u32 = 18;

/// Returns true if `contract_id` designates the native asset.
pub fn is_native(contract_id: &str) -> bool {
    contract_id.is_empty() || contract_id == NATIVE_CONTRACT_ID
}

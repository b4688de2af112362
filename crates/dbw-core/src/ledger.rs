// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LEDGER CLIENT CAPABILITY
//
// Everything the console needs from the wallet/daemon side: heights, address
// validation, balances, contract variables and transaction submission.
// The console never talks to the network directly.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::amount;
use crate::error::{AmountError, LedgerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A recipient address the ledger client has accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address(pub String);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxId(pub String);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One leg of a transaction.
///
/// `amount` is paid to `destination`; `burn` is handed to the invoked contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTransfer {
    /// Contract id of the asset, [`crate::NATIVE_CONTRACT_ID`] for DERO.
    pub asset: String,
    pub destination: Option<String>,
    pub amount: u64,
    pub burn: u64,
}

impl AssetTransfer {
    /// Value deposited into a contract during a call.
    pub fn deposit(asset: &str, burn: u64) -> Self {
        Self {
            asset: asset.to_string(),
            destination: None,
            amount: 0,
            burn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Uint(u64),
}

/// Named argument passed to a contract entrypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArg {
    pub name: String,
    pub value: ArgValue,
}

impl CallArg {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: ArgValue::Text(value.to_string()),
        }
    }
}

/// A contract storage value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    Text(String),
    Uint(u64),
}

impl VarValue {
    /// Numeric view; text holding a decimal integer also qualifies.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            VarValue::Uint(v) => Some(*v),
            VarValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VarValue::Text(s) => Some(s),
            VarValue::Uint(_) => None,
        }
    }
}

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// The wallet's current receive address.
    async fn current_address(&self) -> Result<String, LedgerError>;

    /// Height the local wallet has synchronised to.
    async fn local_sync_height(&self) -> Result<u64, LedgerError>;

    /// Height of the remote chain tip.
    async fn remote_chain_height(&self) -> Result<u64, LedgerError>;

    async fn validate_address(&self, text: &str) -> Result<Address, LedgerError>;

    /// Wallet balance of `asset` (a contract id, or the native id) in minor units.
    async fn asset_balance(&self, asset: &str) -> Result<u64, LedgerError>;

    async fn submit_transfer(
        &self,
        asset: &str,
        recipient: &Address,
        amount: u64,
    ) -> Result<TxId, LedgerError>;

    async fn submit_contract_call(
        &self,
        contract_id: &str,
        transfers: &[AssetTransfer],
        args: &[CallArg],
    ) -> Result<TxId, LedgerError>;

    /// `Ok(None)` when the contract exists but has no such variable.
    async fn lookup_contract_variable(
        &self,
        contract_id: &str,
        name: &str,
    ) -> Result<Option<VarValue>, LedgerError>;

    /// Several variables of one contract, answered in `names` order.
    async fn lookup_contract_variables(
        &self,
        contract_id: &str,
        names: &[&str],
    ) -> Result<Vec<Option<VarValue>>, LedgerError> {
        let mut values = Vec::with_capacity(names.len());
        for name in names {
            values.push(self.lookup_contract_variable(contract_id, name).await?);
        }
        Ok(values)
    }

    /// Every variable of the bridge registry contract, keyed by name.
    async fn list_symbol_table_entries(&self) -> Result<BTreeMap<String, VarValue>, LedgerError>;

    fn parse_amount(&self, text: &str, decimals: u32) -> Result<u64, AmountError> {
        amount::parse_amount(text, decimals)
    }

    fn format_amount(&self, amount: u64, decimals: u32) -> String {
        amount::format_amount(amount, decimals)
    }
}

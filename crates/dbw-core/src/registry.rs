// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BRIDGE TOKEN REGISTRY
//
// Symbol -> (contract id, decimals, bridge fee) table read from the registry
// contract. A refresh builds a complete new table and swaps it in one step;
// readers hold an `Arc` snapshot and never observe a half-built map.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::error::RegistryError;
use crate::ledger::LedgerClient;
use crate::{MAX_DECIMALS, NATIVE_CONTRACT_ID, NATIVE_DECIMALS, NATIVE_SYMBOL};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Registry keys in the symbol-table namespace look like `s:USDT`.
pub const SYMBOL_KEY_PREFIX: &str = "s:";

/// Token contract variable holding the decimal precision.
pub const DECIMALS_VAR: &str = "decimals";

/// Token contract variable holding the per-bridge fee, in native minor units.
pub const BRIDGE_FEE_VAR: &str = "bridgeFee";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntry {
    pub symbol: String,
    pub contract_id: String,
    pub decimals: u32,
    /// Always denominated in the native asset's minor unit.
    pub bridge_fee: u64,
}

impl TokenEntry {
    pub fn native() -> Self {
        Self {
            symbol: NATIVE_SYMBOL.to_string(),
            contract_id: NATIVE_CONTRACT_ID.to_string(),
            decimals: NATIVE_DECIMALS,
            bridge_fee: 0,
        }
    }

    pub fn is_native(&self) -> bool {
        self.symbol == NATIVE_SYMBOL
    }
}

/// Immutable symbol table. Always contains the native entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTable {
    entries: BTreeMap<String, TokenEntry>,
    native: TokenEntry,
}

impl Default for TokenTable {
    fn default() -> Self {
        Self::from_entries(Vec::new())
    }
}

impl TokenTable {
    /// Build a table; the native entry is inserted last and cannot be shadowed.
    pub fn from_entries(entries: impl IntoIterator<Item = TokenEntry>) -> Self {
        let mut map = BTreeMap::new();
        for mut entry in entries {
            entry.symbol = entry.symbol.to_uppercase();
            map.insert(entry.symbol.clone(), entry);
        }
        let native = TokenEntry::native();
        map.insert(native.symbol.clone(), native.clone());
        Self {
            entries: map,
            native,
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, symbol: &str) -> Option<&TokenEntry> {
        self.entries.get(&symbol.to_uppercase())
    }

    pub fn native(&self) -> &TokenEntry {
        &self.native
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenEntry> {
        self.entries.values()
    }
}

/// Balances captured during a refresh. Token rows sorted by symbol, native row last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BalanceSheet {
    pub rows: Vec<(TokenEntry, u64)>,
}

#[derive(Debug, Default)]
pub struct TokenRegistry {
    current: RwLock<Arc<TokenTable>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: TokenTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub fn snapshot(&self) -> Arc<TokenTable> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    fn replace(&self, table: Arc<TokenTable>) {
        match self.current.write() {
            Ok(mut guard) => *guard = table,
            Err(poisoned) => *poisoned.into_inner() = table,
        }
    }

    /// Re-read the registry contract and swap in the new table.
    ///
    /// On any error the previous table is kept untouched.
    pub async fn refresh(&self, ledger: &dyn LedgerClient) -> Result<BalanceSheet, RegistryError> {
        let vars = ledger.list_symbol_table_entries().await?;

        let mut tokens = Vec::new();
        for (key, value) in &vars {
            let Some(symbol) = key.strip_prefix(SYMBOL_KEY_PREFIX) else {
                continue;
            };
            let contract_id = value
                .as_text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| RegistryError::Malformed {
                    key: key.clone(),
                    reason: "expected a contract id".to_string(),
                })?
                .to_string();

            if symbol.is_empty() || symbol.eq_ignore_ascii_case(NATIVE_SYMBOL) {
                log::warn!("ignoring registry entry '{}'", key);
                continue;
            }

            let mut vars = ledger
                .lookup_contract_variables(&contract_id, &[DECIMALS_VAR, BRIDGE_FEE_VAR])
                .await?
                .into_iter();

            let decimals = match vars.next().flatten().and_then(|v| v.as_uint()) {
                Some(d) if d <= MAX_DECIMALS as u64 => d as u32,
                other => {
                    log::warn!(
                        "skipping token {} ({}): unusable decimals {:?}",
                        symbol,
                        contract_id,
                        other
                    );
                    continue;
                }
            };

            let bridge_fee = match vars.next().flatten().and_then(|v| v.as_uint()) {
                Some(fee) => fee,
                None => {
                    log::warn!("token {} has no {}, assuming 0", symbol, BRIDGE_FEE_VAR);
                    0
                }
            };

            tokens.push(TokenEntry {
                symbol: symbol.to_uppercase(),
                contract_id,
                decimals,
                bridge_fee,
            });
        }

        let table = TokenTable::from_entries(tokens);

        let mut rows = Vec::with_capacity(table.len());
        for entry in table.iter().filter(|e| !e.is_native()) {
            let balance = ledger.asset_balance(&entry.contract_id).await?;
            rows.push((entry.clone(), balance));
        }
        let native = table.native().clone();
        let native_balance = ledger.asset_balance(&native.contract_id).await?;
        rows.push((native, native_balance));

        log::debug!("token registry refreshed: {} entries", table.len());
        self.replace(Arc::new(table));
        Ok(BalanceSheet { rows })
    }
}

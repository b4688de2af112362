// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DERO RPC LEDGER CLIENT
//
// Binds the console's ledger capability to a running daemon (chain height,
// contract storage) and a wallet RPC server (address, balances, transfers).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::jsonrpc::{call, Endpoint};
use async_trait::async_trait;
use dbw_core::{
    is_native, Address, ArgValue, AssetTransfer, CallArg, ConsoleConfig, LedgerClient,
    LedgerError, TxId, VarValue,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// bech32 data alphabet
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

#[derive(Deserialize)]
struct AddressResult {
    address: String,
}

#[derive(Deserialize)]
struct HeightResult {
    height: u64,
}

#[derive(Deserialize)]
struct BalanceResult {
    balance: u64,
}

#[derive(Deserialize)]
struct TransferResult {
    txid: String,
}

#[derive(Deserialize)]
struct ScResult {
    #[serde(default)]
    stringkeys: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct TransferParam {
    #[serde(skip_serializing_if = "Option::is_none")]
    scid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    amount: u64,
    burn: u64,
}

impl From<&AssetTransfer> for TransferParam {
    fn from(t: &AssetTransfer) -> Self {
        Self {
            scid: (!is_native(&t.asset)).then(|| t.asset.clone()),
            destination: t.destination.clone(),
            amount: t.amount,
            burn: t.burn,
        }
    }
}

#[derive(Serialize)]
struct ScArgParam {
    name: String,
    datatype: &'static str,
    value: Value,
}

impl From<&CallArg> for ScArgParam {
    fn from(arg: &CallArg) -> Self {
        let (datatype, value) = match &arg.value {
            ArgValue::Text(s) => ("S", json!(s)),
            ArgValue::Uint(v) => ("U", json!(v)),
        };
        Self {
            name: arg.name.clone(),
            datatype,
            value,
        }
    }
}

/// Contract storage as served by `DERO.GetSC`: uint variables are JSON
/// numbers, string variables are hex-encoded.
fn decode_var(value: &Value) -> Option<VarValue> {
    match value {
        Value::Number(n) => n.as_u64().map(VarValue::Uint),
        Value::String(s) => {
            let text = hex::decode(s)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .unwrap_or_else(|| s.clone());
            Some(VarValue::Text(text))
        }
        _ => None,
    }
}

/// Local syntax check before asking the wallet: `<prefix>1...` or `<prefix>i1...`.
fn looks_like_address(text: &str, prefix: &str) -> bool {
    let Some((hrp, data)) = text.rsplit_once('1') else {
        return false;
    };
    let hrp_ok = hrp == prefix || hrp.strip_suffix('i') == Some(prefix);
    hrp_ok && data.len() >= 6 && data.chars().all(|c| BECH32_CHARSET.contains(c))
}

pub struct DeroRpcClient {
    http: reqwest::Client,
    daemon: Endpoint,
    wallet: Endpoint,
    registry: String,
    address_prefix: &'static str,
    ringsize: u64,
    timeout_ms: u64,
}

impl DeroRpcClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.query_timeout_ms))
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let mut wallet = Endpoint::new(config.wallet_rpc_address());
        if let Some((user, password)) = config.login_parts() {
            wallet = wallet.with_basic_auth(user, password);
        }

        Ok(Self {
            http,
            daemon: Endpoint::new(config.daemon_address()),
            wallet,
            registry: config.registry_contract.clone(),
            address_prefix: config.address_prefix(),
            ringsize: config.ringsize,
            timeout_ms: config.query_timeout_ms,
        })
    }

    async fn wallet_call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, LedgerError> {
        call(&self.http, &self.wallet, method, params, self.timeout_ms).await
    }

    async fn daemon_call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, LedgerError> {
        call(&self.http, &self.daemon, method, params, self.timeout_ms).await
    }

    async fn contract_vars(&self, contract_id: &str) -> Result<BTreeMap<String, Value>, LedgerError> {
        let result: ScResult = self
            .daemon_call(
                "DERO.GetSC",
                Some(json!({
                    "scid": contract_id,
                    "code": false,
                    "variables": true,
                })),
            )
            .await?;
        Ok(result.stringkeys)
    }

    async fn transfer(&self, params: Value) -> Result<TxId, LedgerError> {
        let result: TransferResult = self.wallet_call("transfer", Some(params)).await?;
        if result.txid.is_empty() {
            return Err(LedgerError::InvalidResponse(
                "transfer returned an empty txid".to_string(),
            ));
        }
        log::info!("transaction submitted: {}", result.txid);
        Ok(TxId(result.txid))
    }
}

#[async_trait]
impl LedgerClient for DeroRpcClient {
    async fn current_address(&self) -> Result<String, LedgerError> {
        let result: AddressResult = self.wallet_call("GetAddress", None).await?;
        Ok(result.address)
    }

    async fn local_sync_height(&self) -> Result<u64, LedgerError> {
        let result: HeightResult = self.wallet_call("GetHeight", None).await?;
        Ok(result.height)
    }

    async fn remote_chain_height(&self) -> Result<u64, LedgerError> {
        let result: HeightResult = self.daemon_call("DERO.GetHeight", None).await?;
        Ok(result.height)
    }

    async fn validate_address(&self, text: &str) -> Result<Address, LedgerError> {
        if !looks_like_address(text, self.address_prefix) {
            return Err(LedgerError::InvalidAddress(text.to_string()));
        }
        // The wallet verifies the checksum and rejects foreign networks.
        let split: Result<AddressResult, LedgerError> = self
            .wallet_call(
                "SplitIntegratedAddress",
                Some(json!({ "integrated_address": text })),
            )
            .await;
        match split {
            Ok(_) => Ok(Address(text.to_string())),
            Err(LedgerError::Rpc { message, .. }) => {
                log::debug!("wallet rejected address {}: {}", text, message);
                Err(LedgerError::InvalidAddress(text.to_string()))
            }
            Err(other) => Err(other),
        }
    }

    async fn asset_balance(&self, asset: &str) -> Result<u64, LedgerError> {
        let params = if is_native(asset) {
            None
        } else {
            Some(json!({ "scid": asset }))
        };
        let result: BalanceResult = self.wallet_call("GetBalance", params).await?;
        Ok(result.balance)
    }

    async fn submit_transfer(
        &self,
        asset: &str,
        recipient: &Address,
        amount: u64,
    ) -> Result<TxId, LedgerError> {
        let leg = AssetTransfer {
            asset: asset.to_string(),
            destination: Some(recipient.0.clone()),
            amount,
            burn: 0,
        };
        self.transfer(json!({
            "transfers": [TransferParam::from(&leg)],
            "ringsize": self.ringsize,
        }))
        .await
    }

    async fn submit_contract_call(
        &self,
        contract_id: &str,
        transfers: &[AssetTransfer],
        args: &[CallArg],
    ) -> Result<TxId, LedgerError> {
        let transfers: Vec<TransferParam> = transfers.iter().map(TransferParam::from).collect();
        let sc_rpc: Vec<ScArgParam> = args.iter().map(ScArgParam::from).collect();
        self.transfer(json!({
            "scid": contract_id,
            "ringsize": self.ringsize,
            "sc_rpc": sc_rpc,
            "transfers": transfers,
        }))
        .await
    }

    async fn lookup_contract_variable(
        &self,
        contract_id: &str,
        name: &str,
    ) -> Result<Option<VarValue>, LedgerError> {
        let vars = self.contract_vars(contract_id).await?;
        Ok(vars.get(name).and_then(decode_var))
    }

    /// One `DERO.GetSC` for the whole batch.
    async fn lookup_contract_variables(
        &self,
        contract_id: &str,
        names: &[&str],
    ) -> Result<Vec<Option<VarValue>>, LedgerError> {
        let vars = self.contract_vars(contract_id).await?;
        Ok(names
            .iter()
            .map(|name| vars.get(*name).and_then(decode_var))
            .collect())
    }

    async fn list_symbol_table_entries(&self) -> Result<BTreeMap<String, VarValue>, LedgerError> {
        let vars = self.contract_vars(&self.registry).await?;
        Ok(vars
            .iter()
            .filter_map(|(k, v)| decode_var(v).map(|v| (k.clone(), v)))
            .collect())
    }
}

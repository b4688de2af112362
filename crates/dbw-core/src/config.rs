use crate::error::ConfigError;
use crate::DEFAULT_BRIDGE_REGISTRY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MAINNET_DAEMON: &str = "127.0.0.1:10102";
const MAINNET_WALLET_RPC: &str = "127.0.0.1:10103";
const TESTNET_DAEMON: &str = "127.0.0.1:40402";
const TESTNET_WALLET_RPC: &str = "127.0.0.1:40403";

/// Console configuration, built once at startup and handed to the
/// ledger client and console constructors.
///
/// Precedence (lowest first): defaults, TOML file, `DBW_*` environment
/// variables, command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Daemon RPC `host:port`; network default when unset.
    pub daemon_address: Option<String>,
    /// Wallet RPC server `host:port`; network default when unset.
    pub wallet_rpc_address: Option<String>,
    /// `user:password` for the wallet RPC server.
    pub rpc_login: Option<String>,
    pub registry_contract: String,
    pub testnet: bool,
    pub heartbeat_interval_ms: u64,
    pub query_timeout_ms: u64,
    pub ringsize: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            daemon_address: None,
            wallet_rpc_address: None,
            rpc_login: None,
            registry_contract: DEFAULT_BRIDGE_REGISTRY.to_string(),
            testnet: false,
            heartbeat_interval_ms: 100,
            query_timeout_ms: 2_000,
            ringsize: 2,
        }
    }
}

impl ConsoleConfig {
    /// Load console config from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: ConsoleConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay `DBW_*` values looked up through `var` (`std::env::var` in the binary).
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = var("DBW_DAEMON_ADDRESS") {
            self.daemon_address = Some(v);
        }
        if let Some(v) = var("DBW_WALLET_RPC") {
            self.wallet_rpc_address = Some(v);
        }
        if let Some(v) = var("DBW_RPC_LOGIN") {
            self.rpc_login = Some(v);
        }
        if let Some(v) = var("DBW_REGISTRY") {
            self.registry_contract = v;
        }
        if let Some(v) = var("DBW_TESTNET") {
            self.testnet = match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        field: "DBW_TESTNET",
                        reason: format!("'{}' is not a boolean", v),
                    })
                }
            };
        }
        Ok(())
    }

    pub fn daemon_address(&self) -> &str {
        match &self.daemon_address {
            Some(addr) => addr.as_str(),
            None if self.testnet => TESTNET_DAEMON,
            None => MAINNET_DAEMON,
        }
    }

    pub fn wallet_rpc_address(&self) -> &str {
        match &self.wallet_rpc_address {
            Some(addr) => addr.as_str(),
            None if self.testnet => TESTNET_WALLET_RPC,
            None => MAINNET_WALLET_RPC,
        }
    }

    /// Split `rpc_login` into `(user, password)`; password is `None` when absent.
    pub fn login_parts(&self) -> Option<(String, Option<String>)> {
        self.rpc_login.as_ref().map(|login| match login.split_once(':') {
            Some((user, pass)) => (user.to_string(), Some(pass.to_string())),
            None => (login.clone(), None),
        })
    }

    /// Human-readable address prefix the wallet expects on this network.
    pub fn address_prefix(&self) -> &'static str {
        if self.testnet {
            "deto"
        } else {
            "dero"
        }
    }

    /// Validate config values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, addr) in [
            ("daemon_address", self.daemon_address()),
            ("wallet_rpc_address", self.wallet_rpc_address()),
        ] {
            if addr.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "address is empty".to_string(),
                });
            }
        }

        let registry_ok = self.registry_contract.len() == 64
            && hex::decode(&self.registry_contract).is_ok();
        if !registry_ok {
            return Err(ConfigError::Invalid {
                field: "registry_contract",
                reason: format!(
                    "'{}' is not a 64-digit hex contract id",
                    self.registry_contract
                ),
            });
        }

        if self.heartbeat_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "heartbeat_interval_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "query_timeout_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.ringsize < 2 || !self.ringsize.is_power_of_two() {
            return Err(ConfigError::Invalid {
                field: "ringsize",
                reason: format!("{} is not a power of two >= 2", self.ringsize),
            });
        }
        if let Some((user, _)) = self.login_parts() {
            if user.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "rpc_login",
                    reason: "user name is empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

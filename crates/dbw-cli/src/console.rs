// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONSOLE - read / parse / dispatch
//
// Two entry points, one dispatcher: `eval` for a single command line and
// `run` for the interactive loop with the status heartbeat alongside.
// Every command error is reported inline; only terminal I/O failure ends `run`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::command::{Command, Entry, Verb, BRIDGE_USAGE, HELP, MODE_USAGE, TRANSFER_USAGE};
use crate::confirm::{confirm, ConfirmationRequest};
use crate::editor::{EditMode, ReadOutcome};
use crate::error::{CommandError, ConsoleError};
use crate::heartbeat::Heartbeat;
use crate::output::Output;
use crate::prompt::PromptLock;
use colored::*;
use dbw_core::{
    Address, AssetTransfer, CallArg, ConsoleConfig, LedgerClient, LedgerError, TokenRegistry,
    NATIVE_CONTRACT_ID, NATIVE_DECIMALS, NATIVE_SYMBOL,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Contract entrypoint that locks tokens for release on Ethereum.
pub const BRIDGE_ENTRYPOINT: &str = "Bridge";

/// Consecutive editor failures tolerated before the loop gives up.
const MAX_INPUT_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_eth_address(text: &str) -> bool {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

pub struct Console {
    config: ConsoleConfig,
    ledger: Arc<dyn LedgerClient>,
    registry: TokenRegistry,
    prompt: Arc<PromptLock>,
    out: Output,
}

impl Console {
    pub fn new(
        config: ConsoleConfig,
        ledger: Arc<dyn LedgerClient>,
        prompt: Arc<PromptLock>,
        out: Output,
    ) -> Self {
        Self {
            config,
            ledger,
            registry: TokenRegistry::new(),
            prompt,
            out,
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Banner and the initial balance table.
    pub async fn startup(&self) {
        let network = if self.config.testnet { "testnet" } else { "mainnet" };
        self.out.line(format!(
            "{} {}",
            "DERO bridge wallet".cyan().bold(),
            format!("v{} ({})", env!("CARGO_PKG_VERSION"), network).cyan()
        ));
        self.out.line(format!("Type {} for a list of commands.", "help".bold()));
        self.out.line("");
        if let Err(e) = self.balance().await {
            self.report(&e);
        }
    }

    /// Evaluate one command line outside the interactive loop.
    pub async fn eval(&self, line: &str) -> Flow {
        match Command::parse(line, Entry::OneShot) {
            Some(cmd) => self.dispatch(cmd).await,
            None => Flow::Continue,
        }
    }

    /// Interactive loop. Returns once the operator quits or input ends.
    pub async fn run(&self) -> Result<(), ConsoleError> {
        let (stop, stopped) = watch::channel(false);
        let heartbeat = Heartbeat::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.prompt),
            Duration::from_millis(self.config.heartbeat_interval_ms),
            Duration::from_millis(self.config.query_timeout_ms),
        )
        .spawn(stopped);

        let result = self.read_loop().await;

        if stop.send(true).is_err() {
            log::debug!("heartbeat already gone");
        }
        heartbeat.await?;
        result
    }

    async fn read_loop(&self) -> Result<(), ConsoleError> {
        let editor = self.prompt.editor();
        let mut failures = 0;

        loop {
            // Read outside the prompt lock so the heartbeat keeps repainting.
            let reader = Arc::clone(&editor);
            let outcome = tokio::task::spawn_blocking(move || reader.read_line()).await?;

            match outcome {
                ReadOutcome::Line(line) => {
                    failures = 0;
                    if let Some(cmd) = Command::parse(&line, Entry::Interactive) {
                        if self.dispatch(cmd).await == Flow::Quit {
                            return Ok(());
                        }
                    }
                    if self.out.has_failed() {
                        return Err(ConsoleError::Output);
                    }
                }
                ReadOutcome::Interrupted(partial) => {
                    if partial.is_empty() {
                        return Ok(());
                    }
                }
                ReadOutcome::EndOfInput => return Ok(()),
                ReadOutcome::Failed(e) => {
                    log::error!("line editor failed: {}", e);
                    self.out.error(format!("Input error: {}", e));
                    failures += 1;
                    if failures >= MAX_INPUT_FAILURES {
                        return Err(ConsoleError::Io(e));
                    }
                }
            }
        }
    }

    async fn dispatch(&self, cmd: Command) -> Flow {
        log::debug!("dispatch {:?} ({} args)", cmd.verb, cmd.args.len());
        let result = match cmd.verb {
            Verb::Quit => return Flow::Quit,
            Verb::Help => {
                self.out.line(HELP);
                Ok(())
            }
            Verb::Address => self.address().await,
            Verb::Balance => self.balance().await,
            Verb::Transfer => self.transfer(&cmd.args).await,
            Verb::Bridge => self.bridge(&cmd.args).await,
            Verb::Mode => self.mode(&cmd.args).await,
            Verb::Unknown(word) => Err(CommandError::UnknownCommand(word)),
        };
        if let Err(e) = result {
            self.report(&e);
        }
        Flow::Continue
    }

    fn report(&self, e: &CommandError) {
        match e {
            CommandError::Submission(cause) => log::warn!("submission failed: {}", cause),
            CommandError::InvalidAmount { source, .. } => log::debug!("amount rejected: {}", source),
            CommandError::RegistryUnavailable(cause) => log::warn!("registry refresh failed: {}", cause),
            _ => log::debug!("command failed: {}", e),
        }
        self.out.error(e.to_string());
    }

    // ─────────────────────────────────────────────────────────────────
    // HANDLERS
    // ─────────────────────────────────────────────────────────────────

    async fn address(&self) -> Result<(), CommandError> {
        let address = self.ledger.current_address().await?;
        self.out.info(format!("Wallet address {}", address));
        Ok(())
    }

    async fn balance(&self) -> Result<(), CommandError> {
        let sheet = self.registry.refresh(self.ledger.as_ref()).await?;

        self.out.line(format!(
            "{:<10} {:<64} {:>24}",
            "SYMBOL".bold(),
            "CONTRACT".bold(),
            "BALANCE".bold()
        ));
        for (token, balance) in &sheet.rows {
            self.out.line(format!(
                "{:<10} {:<64} {:>24}",
                token.symbol,
                token.contract_id,
                self.ledger.format_amount(*balance, token.decimals)
            ));
        }
        self.out.line("");
        Ok(())
    }

    async fn recipient(&self, text: &str) -> Result<Address, CommandError> {
        match self.ledger.validate_address(text).await {
            Ok(address) => Ok(address),
            Err(LedgerError::InvalidAddress(_)) => Err(CommandError::InvalidAddress(text.to_string())),
            Err(other) => Err(other.into()),
        }
    }

    async fn transfer(&self, args: &[String]) -> Result<(), CommandError> {
        let [symbol, recipient, amount] = args else {
            return Err(CommandError::Usage(TRANSFER_USAGE.to_string()));
        };

        let table = self.registry.snapshot();
        let token = table
            .get(symbol)
            .ok_or_else(|| CommandError::UnknownToken(symbol.clone()))?;
        let units = self
            .ledger
            .parse_amount(amount, token.decimals)
            .map_err(|source| CommandError::InvalidAmount {
                text: amount.clone(),
                source,
            })?;
        let address = self.recipient(recipient).await?;

        let request = ConfirmationRequest::new(format!(
            "Transfer {} {} to {}",
            self.ledger.format_amount(units, token.decimals),
            token.symbol,
            address
        ));
        if !confirm(&self.prompt, &self.out, &request).await {
            return Ok(());
        }

        let txid = self
            .ledger
            .submit_transfer(&token.contract_id, &address, units)
            .await
            .map_err(CommandError::Submission)?;
        log::info!("transfer {} {} -> {} txid {}", units, token.symbol, address, txid);
        self.out.success(format!("Transaction submitted: txid = {}", txid));
        Ok(())
    }

    async fn bridge(&self, args: &[String]) -> Result<(), CommandError> {
        let [symbol, eth_address, amount] = args else {
            return Err(CommandError::Usage(BRIDGE_USAGE.to_string()));
        };
        if symbol.eq_ignore_ascii_case(NATIVE_SYMBOL) {
            return Err(CommandError::NativeBridge(NATIVE_SYMBOL.to_string()));
        }

        let table = self.registry.snapshot();
        let token = table
            .get(symbol)
            .ok_or_else(|| CommandError::UnknownToken(symbol.clone()))?;
        let units = self
            .ledger
            .parse_amount(amount, token.decimals)
            .map_err(|source| CommandError::InvalidAmount {
                text: amount.clone(),
                source,
            })?;
        if !is_eth_address(eth_address) {
            return Err(CommandError::InvalidExternalAddress(eth_address.clone()));
        }

        let request = ConfirmationRequest::new(format!(
            "Transfer {} {} to Ethereum address {}\nBridge fee {} {}",
            self.ledger.format_amount(units, token.decimals),
            token.symbol,
            eth_address,
            self.ledger.format_amount(token.bridge_fee, NATIVE_DECIMALS),
            NATIVE_SYMBOL
        ));
        if !confirm(&self.prompt, &self.out, &request).await {
            return Ok(());
        }

        // Token amount and fee are both burned into the bridge contract.
        let transfers = [
            AssetTransfer::deposit(&token.contract_id, units),
            AssetTransfer::deposit(NATIVE_CONTRACT_ID, token.bridge_fee),
        ];
        let call_args = [
            CallArg::text("entrypoint", BRIDGE_ENTRYPOINT),
            CallArg::text("eth_addr", eth_address),
        ];
        let txid = self
            .ledger
            .submit_contract_call(&token.contract_id, &transfers, &call_args)
            .await
            .map_err(CommandError::Submission)?;
        log::info!("bridge {} {} -> {} txid {}", units, token.symbol, eth_address, txid);
        self.out.success(format!("Transaction submitted: txid = {}", txid));
        Ok(())
    }

    async fn mode(&self, args: &[String]) -> Result<(), CommandError> {
        let [name] = args else {
            return Err(CommandError::Usage(MODE_USAGE.to_string()));
        };
        let mode: EditMode = name.parse().map_err(CommandError::InvalidMode)?;
        self.prompt.lock().await.set_mode(mode);
        Ok(())
    }
}

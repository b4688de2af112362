// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Shared fixtures: in-memory ledger, scripted line editors, output capture.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
#![allow(dead_code)]

use async_trait::async_trait;
use dbw_cli::editor::{EditMode, LineEditor, ReadOutcome};
use dbw_cli::{Console, Output, PromptLock};
use dbw_core::{
    Address, AssetTransfer, CallArg, ConsoleConfig, LedgerClient, LedgerError, TxId, VarValue,
    NATIVE_CONTRACT_ID,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

pub const USDT_SCID: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";
pub const RECIPIENT: &str = "deto1qyre7td6x9r88y4cavdgpv6k7lvx6j39lfsx420hpvh3ydpcrtxrxqg8v8e3z";
pub const ETH_ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
pub const TXID: &str = "5c0ffee5c0ffee5c0ffee5c0ffee5c0ffee5c0ffee5c0ffee5c0ffee5c0ffee0";

// ─────────────────────────────────────────────────────────────────
// LEDGER STUB
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Transfer {
        asset: String,
        recipient: String,
        amount: u64,
    },
    Call {
        contract_id: String,
        transfers: Vec<AssetTransfer>,
        args: Vec<CallArg>,
    },
}

/// Wallet with one registered token (USDT, 6 decimals, 0.5 DERO bridge fee).
/// Accepts any `deto1` address and every submission unless told otherwise.
pub struct StubLedger {
    local: AtomicU64,
    remote: AtomicU64,
    pub offline: AtomicBool,
    /// Wallet height queries never answer.
    pub stalled: AtomicBool,
    pub reject_submissions: AtomicBool,
    registry: BTreeMap<String, VarValue>,
    vars: HashMap<(String, String), VarValue>,
    balances: HashMap<String, u64>,
    pub submissions: Mutex<Vec<Submission>>,
    pub height_queries: AtomicU64,
}

impl StubLedger {
    pub fn new() -> Self {
        let mut registry = BTreeMap::new();
        registry.insert("s:USDT".to_string(), VarValue::Text(USDT_SCID.to_string()));

        let mut vars = HashMap::new();
        vars.insert(
            (USDT_SCID.to_string(), "decimals".to_string()),
            VarValue::Uint(6),
        );
        vars.insert(
            (USDT_SCID.to_string(), "bridgeFee".to_string()),
            VarValue::Uint(50_000),
        );

        let mut balances = HashMap::new();
        balances.insert(USDT_SCID.to_string(), 25_000_000);
        balances.insert(NATIVE_CONTRACT_ID.to_string(), 1_234_567);

        Self {
            local: AtomicU64::new(100),
            remote: AtomicU64::new(120),
            offline: AtomicBool::new(false),
            stalled: AtomicBool::new(false),
            reject_submissions: AtomicBool::new(false),
            registry,
            vars,
            balances,
            submissions: Mutex::new(Vec::new()),
            height_queries: AtomicU64::new(0),
        }
    }

    pub fn set_heights(&self, local: u64, remote: u64) {
        self.local.store(local, Ordering::SeqCst);
        self.remote.store(remote, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<(), LedgerError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(LedgerError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }

    fn submit(&self, submission: Submission) -> Result<TxId, LedgerError> {
        if self.reject_submissions.load(Ordering::SeqCst) {
            return Err(LedgerError::Rpc {
                code: -32098,
                message: "insufficient balance".into(),
            });
        }
        self.submissions.lock().unwrap().push(submission);
        Ok(TxId(TXID.to_string()))
    }
}

#[async_trait]
impl LedgerClient for StubLedger {
    async fn current_address(&self) -> Result<String, LedgerError> {
        self.check_online()?;
        Ok(RECIPIENT.to_string())
    }

    async fn local_sync_height(&self) -> Result<u64, LedgerError> {
        self.check_online()?;
        self.height_queries.fetch_add(1, Ordering::SeqCst);
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        Ok(self.local.load(Ordering::SeqCst))
    }

    async fn remote_chain_height(&self) -> Result<u64, LedgerError> {
        self.check_online()?;
        Ok(self.remote.load(Ordering::SeqCst))
    }

    async fn validate_address(&self, text: &str) -> Result<Address, LedgerError> {
        if text.starts_with("deto1") && text.len() > 10 {
            Ok(Address(text.to_string()))
        } else {
            Err(LedgerError::InvalidAddress(text.to_string()))
        }
    }

    async fn asset_balance(&self, asset: &str) -> Result<u64, LedgerError> {
        self.check_online()?;
        Ok(self.balances.get(asset).copied().unwrap_or(0))
    }

    async fn submit_transfer(
        &self,
        asset: &str,
        recipient: &Address,
        amount: u64,
    ) -> Result<TxId, LedgerError> {
        self.submit(Submission::Transfer {
            asset: asset.to_string(),
            recipient: recipient.0.clone(),
            amount,
        })
    }

    async fn submit_contract_call(
        &self,
        contract_id: &str,
        transfers: &[AssetTransfer],
        args: &[CallArg],
    ) -> Result<TxId, LedgerError> {
        self.submit(Submission::Call {
            contract_id: contract_id.to_string(),
            transfers: transfers.to_vec(),
            args: args.to_vec(),
        })
    }

    async fn lookup_contract_variable(
        &self,
        contract_id: &str,
        name: &str,
    ) -> Result<Option<VarValue>, LedgerError> {
        self.check_online()?;
        Ok(self
            .vars
            .get(&(contract_id.to_string(), name.to_string()))
            .cloned())
    }

    async fn list_symbol_table_entries(&self) -> Result<BTreeMap<String, VarValue>, LedgerError> {
        self.check_online()?;
        Ok(self.registry.clone())
    }
}

// ─────────────────────────────────────────────────────────────────
// EDITORS
// ─────────────────────────────────────────────────────────────────

/// Replays a fixed list of outcomes, then reports end of input.
/// Records the prompt that was showing at every read.
pub struct ScriptedEditor {
    script: Mutex<VecDeque<ReadOutcome>>,
    prompt: Mutex<String>,
    pub prompts_at_read: Mutex<Vec<String>>,
    pub mode: Mutex<Option<EditMode>>,
}

impl ScriptedEditor {
    pub fn lines(lines: &[&str]) -> Self {
        Self::outcomes(
            lines
                .iter()
                .map(|l| ReadOutcome::Line(l.to_string()))
                .collect(),
        )
    }

    pub fn outcomes(outcomes: Vec<ReadOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            prompt: Mutex::new(String::new()),
            prompts_at_read: Mutex::new(Vec::new()),
            mode: Mutex::new(None),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    pub fn prompts_at_read(&self) -> Vec<String> {
        self.prompts_at_read.lock().unwrap().clone()
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&self) -> ReadOutcome {
        let prompt = self.prompt.lock().unwrap().clone();
        self.prompts_at_read.lock().unwrap().push(prompt);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ReadOutcome::EndOfInput)
    }

    fn set_prompt(&self, prompt: &str) {
        *self.prompt.lock().unwrap() = prompt.to_string();
    }

    fn redraw(&self) {}

    fn set_edit_mode(&self, mode: EditMode) {
        *self.mode.lock().unwrap() = Some(mode);
    }
}

/// Blocks every read until the test feeds an outcome through the channel.
pub struct BlockingEditor {
    answers: Mutex<mpsc::Receiver<ReadOutcome>>,
    prompt: Mutex<String>,
    reading: AtomicBool,
    pub prompt_history: Mutex<Vec<String>>,
}

impl BlockingEditor {
    pub fn new() -> (Self, mpsc::Sender<ReadOutcome>) {
        let (tx, rx) = mpsc::channel();
        let editor = Self {
            answers: Mutex::new(rx),
            prompt: Mutex::new(String::new()),
            reading: AtomicBool::new(false),
            prompt_history: Mutex::new(Vec::new()),
        };
        (editor, tx)
    }

    pub fn prompt(&self) -> String {
        self.prompt.lock().unwrap().clone()
    }

    pub fn is_reading(&self) -> bool {
        self.reading.load(Ordering::SeqCst)
    }

    pub fn prompt_history(&self) -> Vec<String> {
        self.prompt_history.lock().unwrap().clone()
    }
}

impl LineEditor for BlockingEditor {
    fn read_line(&self) -> ReadOutcome {
        self.reading.store(true, Ordering::SeqCst);
        let outcome = self
            .answers
            .lock()
            .unwrap()
            .recv()
            .unwrap_or(ReadOutcome::EndOfInput);
        self.reading.store(false, Ordering::SeqCst);
        outcome
    }

    fn set_prompt(&self, prompt: &str) {
        *self.prompt.lock().unwrap() = prompt.to_string();
        self.prompt_history.lock().unwrap().push(prompt.to_string());
    }

    fn redraw(&self) {}

    fn set_edit_mode(&self, _mode: EditMode) {}
}

// ─────────────────────────────────────────────────────────────────
// OUTPUT CAPTURE
// ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub ledger: Arc<StubLedger>,
    pub prompt: Arc<PromptLock>,
    pub console: Console,
    pub out: Capture,
    pub err: Capture,
}

pub fn test_config() -> ConsoleConfig {
    ConsoleConfig {
        testnet: true,
        heartbeat_interval_ms: 20,
        query_timeout_ms: 500,
        ..ConsoleConfig::default()
    }
}

/// Console wired to `editor` and a fresh [`StubLedger`], with uncoloured output.
pub fn harness(editor: Arc<dyn LineEditor>) -> Harness {
    colored::control::set_override(false);
    let ledger = Arc::new(StubLedger::new());
    let prompt = Arc::new(PromptLock::new(editor, "» "));
    let out = Capture::default();
    let err = Capture::default();
    let output = Output::new(Box::new(out.clone()), Box::new(err.clone()));
    let console = Console::new(
        test_config(),
        Arc::clone(&ledger) as Arc<dyn LedgerClient>,
        Arc::clone(&prompt),
        output,
    );
    Harness {
        ledger,
        prompt,
        console,
        out,
        err,
    }
}

/// Poll `check` until it holds or `limit` elapses.
pub async fn eventually(limit: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    check()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DBW - DERO bridge wallet console
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::Parser;
use colored::*;
use dbw_cli::editor::{LineEditor, PipedEditor, TerminalEditor};
use dbw_cli::{Console, Output, PromptLock};
use dbw_core::{ConfigError, ConsoleConfig, LedgerClient};
use dbw_rpc::DeroRpcClient;
use env_logger::Env;
use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

const EXIT_IO: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "dbw")]
#[command(about = "DERO bridge wallet - transfer and bridge tokens from the console", long_about = None)]
#[command(version)]
struct Cli {
    /// Daemon RPC host:port (default 127.0.0.1:10102, testnet 127.0.0.1:40402)
    #[arg(long)]
    daemon_address: Option<String>,

    /// Wallet RPC server host:port (default 127.0.0.1:10103, testnet 127.0.0.1:40403)
    #[arg(long)]
    wallet_rpc: Option<String>,

    /// Wallet RPC credentials as user:password; the password is prompted when omitted
    #[arg(long)]
    rpc_login: Option<String>,

    /// Use testnet ports and address prefix
    #[arg(long)]
    testnet: bool,

    /// Bridge registry contract id
    #[arg(long)]
    registry: Option<String>,

    /// Config directory (default: ~/.dbw)
    #[arg(long, env = "DBW_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Config file (default: <config-dir>/config.toml, if present)
    #[arg(long, env = "DBW_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `dbw_rpc=trace` (overrides RUST_LOG)
    #[arg(long, env = "DBW_LOG_LEVEL")]
    log_level: Option<String>,

    /// Run one console command and exit
    #[arg(short = 'c', long = "command")]
    command: Option<String>,
}

impl Cli {
    fn overlay(&self, config: &mut ConsoleConfig) {
        if let Some(addr) = &self.daemon_address {
            config.daemon_address = Some(addr.clone());
        }
        if let Some(addr) = &self.wallet_rpc {
            config.wallet_rpc_address = Some(addr.clone());
        }
        if let Some(login) = &self.rpc_login {
            config.rpc_login = Some(login.clone());
        }
        if let Some(scid) = &self.registry {
            config.registry_contract = scid.clone();
        }
        if self.testnet {
            config.testnet = true;
        }
    }
}

fn config_dir(cli: &Cli) -> PathBuf {
    cli.config_dir.clone().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dbw")
    })
}

/// Defaults, then the TOML file, then `DBW_*` variables (read through `env`), then flags.
fn load_config(
    cli: &Cli,
    dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ConsoleConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::load_from_file(path)?,
        None => {
            let default_path = dir.join("config.toml");
            if default_path.is_file() {
                ConsoleConfig::load_from_file(&default_path)?
            } else {
                ConsoleConfig::default()
            }
        }
    };
    config.apply_vars(env)?;
    cli.overlay(&mut config);
    config.validate()?;
    Ok(config)
}

/// Logs go to `<config-dir>/dbw.log` so they never land on the prompt line.
fn init_logging(cli: &Cli, dir: &Path) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(filter) = &cli.log_level {
        builder.parse_filters(filter);
    }
    builder.format_timestamp_millis();

    let log_path = dir.join("dbw.log");
    let opened = std::fs::create_dir_all(dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
    });
    match opened {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!(
            "{} cannot open {}: {}, logging to stderr",
            "⚠".yellow(),
            log_path.display(),
            e
        ),
    }
    builder.try_init()
}

/// Ask for the wallet RPC password when only a user name was given.
fn complete_login(config: &mut ConsoleConfig) -> io::Result<()> {
    if let Some((user, None)) = config.login_parts() {
        if io::stdin().is_terminal() {
            let password = rpassword::prompt_password(format!("Wallet RPC password for {}: ", user))?;
            config.rpc_login = Some(format!("{}:{}", user, password));
        }
    }
    Ok(())
}

/// Only a missing terminal falls back to plain stdin; a terminal that
/// refuses raw mode is an I/O failure.
fn reads_from_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported
}

fn open_editor(initial_prompt: &str) -> io::Result<Arc<dyn LineEditor>> {
    match TerminalEditor::new(initial_prompt) {
        Ok(editor) => Ok(Arc::new(editor)),
        Err(e) if reads_from_pipe(&e) => {
            log::info!("no interactive terminal ({}), reading lines from stdin", e);
            Ok(Arc::new(PipedEditor::stdin()))
        }
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dir = config_dir(&cli);
    if let Err(e) = init_logging(&cli, &dir) {
        eprintln!("{} logging disabled: {}", "⚠".yellow(), e);
    }

    let out = Output::stdio();

    let mut config = match load_config(&cli, &dir, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration rejected: {}", e);
            out.error(format!("Configuration error: {}", e));
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    if let Err(e) = complete_login(&mut config) {
        out.error(format!("Cannot read password: {}", e));
        return ExitCode::from(EXIT_IO);
    }

    let ledger: Arc<dyn LedgerClient> = match DeroRpcClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("ledger client setup failed: {}", e);
            out.error(format!("Configuration error: {}", e));
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    log::info!(
        "daemon {} wallet {} registry {}",
        config.daemon_address(),
        config.wallet_rpc_address(),
        config.registry_contract
    );

    let initial_prompt = format!("{} ", "»".red());

    if let Some(line) = &cli.command {
        let editor: Arc<dyn LineEditor> = Arc::new(PipedEditor::stdin());
        let prompt = Arc::new(PromptLock::new(editor, &initial_prompt));
        let console = Console::new(config, Arc::clone(&ledger), prompt, out.clone());
        if let Err(e) = console.registry().refresh(ledger.as_ref()).await {
            log::warn!("token registry unavailable: {}", e);
        }
        console.eval(line).await;
        return if out.has_failed() {
            ExitCode::from(EXIT_IO)
        } else {
            ExitCode::SUCCESS
        };
    }

    let editor = match open_editor(&initial_prompt) {
        Ok(editor) => editor,
        Err(e) => {
            log::error!("terminal setup failed: {}", e);
            out.error(format!("Cannot use the terminal: {}", e));
            return ExitCode::from(EXIT_IO);
        }
    };
    let prompt = Arc::new(PromptLock::new(editor, &initial_prompt));
    let console = Console::new(config, ledger, prompt, out.clone());
    console.startup().await;

    match console.run().await {
        Ok(()) if out.has_failed() => ExitCode::from(EXIT_IO),
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("console stopped: {}", e);
            out.error(e.to_string());
            ExitCode::from(EXIT_IO)
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────

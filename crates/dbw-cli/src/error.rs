//! Console error taxonomy.
//!
//! Every [`CommandError`] is local to one command: it is reported inline and
//! the console keeps reading. Only [`ConsoleError`] ends the session.

use dbw_core::{AmountError, LedgerError, RegistryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    /// Wrong argument count; carries the usage line.
    #[error("{0}")]
    Usage(String),
    #[error("Token '{0}' not found.")]
    UnknownToken(String),
    #[error("Cannot parse amount '{text}'")]
    InvalidAmount {
        text: String,
        #[source]
        source: AmountError,
    },
    #[error("Cannot parse wallet address '{0}'")]
    InvalidAddress(String),
    #[error("Cannot parse Ethereum address '{0}'")]
    InvalidExternalAddress(String),
    #[error("Cannot bridge {0} (yet).")]
    NativeBridge(String),
    #[error("Transaction failed.")]
    Submission(#[source] LedgerError),
    #[error("Token registry unavailable, showing nothing new: {0}")]
    RegistryUnavailable(#[from] RegistryError),
    #[error("Ledger request failed: {0}")]
    Ledger(#[from] LedgerError),
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("cannot write to the console")]
    Output,
}

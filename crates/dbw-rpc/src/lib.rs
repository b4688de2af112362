//! JSON-RPC ledger client for the bridge wallet console.
//!
//! Talks to a DERO daemon (`DERO.GetHeight`, `DERO.GetSC`) and to a wallet
//! started with its RPC server enabled (`GetAddress`, `GetBalance`, `transfer`, ...).

mod client;
pub mod jsonrpc;

pub use client::DeroRpcClient;

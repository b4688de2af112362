//! Minimal JSON-RPC 2.0 transport over `reqwest`.

use dbw_core::LedgerError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// One JSON-RPC server (daemon or wallet).
#[derive(Debug, Clone)]
pub struct Endpoint {
    url: String,
    auth: Option<(String, Option<String>)>,
}

impl Endpoint {
    /// Accepts `host:port` or a full URL; `/json_rpc` is appended when missing.
    pub fn new(address: &str) -> Self {
        let address = address.trim().trim_end_matches('/');
        let base = if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };
        let url = if base.ends_with("/json_rpc") {
            base
        } else {
            format!("{}/json_rpc", base)
        };
        Self { url, auth: None }
    }

    pub fn with_basic_auth(mut self, user: String, password: Option<String>) -> Self {
        self.auth = Some((user, password));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

fn transport_error(err: reqwest::Error, timeout_ms: u64) -> LedgerError {
    if err.is_timeout() {
        LedgerError::Timeout(timeout_ms)
    } else {
        LedgerError::Transport(err.to_string())
    }
}

/// POST `method` with `params` and decode the `result` member.
pub async fn call<T: DeserializeOwned>(
    http: &reqwest::Client,
    endpoint: &Endpoint,
    method: &str,
    params: Option<Value>,
    timeout_ms: u64,
) -> Result<T, LedgerError> {
    let mut body = json!({
        "jsonrpc": "2.0",
        "id": "1",
        "method": method,
    });
    if let Some(params) = params {
        body["params"] = params;
    }

    let mut request = http.post(&endpoint.url).json(&body);
    if let Some((user, password)) = &endpoint.auth {
        request = request.basic_auth(user, password.as_ref());
    }

    log::trace!("rpc -> {} {}", endpoint.url, method);
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(e, timeout_ms))?;

    if !response.status().is_success() {
        return Err(LedgerError::Transport(format!(
            "{} returned HTTP {}",
            method,
            response.status()
        )));
    }

    let envelope: Envelope<T> = response.json().await.map_err(|e| {
        if e.is_timeout() {
            LedgerError::Timeout(timeout_ms)
        } else {
            LedgerError::InvalidResponse(format!("{}: {}", method, e))
        }
    })?;

    if let Some(err) = envelope.error {
        return Err(LedgerError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    envelope
        .result
        .ok_or_else(|| LedgerError::InvalidResponse(format!("{}: missing result", method)))
}

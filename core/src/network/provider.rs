/// EIP-1193 style request interface and its JSON-RPC over HTTP implementation.
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED: i64 = 4001;
/// EIP-1193: the requested account or method has not been authorized.
pub const UNAUTHORIZED: i64 = 4100;

/// Error returned by a wallet endpoint, or by the transport in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// JSON-RPC error object (`code`, `message`).
    Rpc { code: i64, message: String },
    /// Nothing is listening at the endpoint; the request never reached a wallet.
    Unreachable(String),
    /// HTTP status, timeout or body decoding failure.
    Transport(String),
}

impl ProviderError {
    /// True for failures where the wallet may still answer a later request.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Rpc { .. })
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rpc { code, message } => write!(f, "{message} (code {code})"),
            Self::Unreachable(msg) | Self::Transport(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// The one capability a wallet exposes: `request({ method, params })`.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Endpoint description for status output.
    fn endpoint(&self) -> &str;
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 over HTTP, e.g. Frame on `127.0.0.1:1248` or a dev node.
pub struct HttpProvider {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, id, "wallet request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let message = format!("Failed to reach wallet at {}: {e}", self.url);
                if e.is_connect() {
                    ProviderError::Unreachable(message)
                } else {
                    ProviderError::Transport(message)
                }
            })?;

        let status = response.status();
        let parsed: RpcResponse = response.json().await.map_err(|e| {
            ProviderError::Transport(format!("Invalid response from wallet (HTTP {status}): {e}"))
        })?;

        if let Some(err) = parsed.error {
            return Err(ProviderError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

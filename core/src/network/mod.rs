/// Wallet gateway: a narrow facade over the wallet provider and the `Transactions` contract.
mod contract;
mod provider;
mod types;

pub use contract::{ContractHandle, TransferStruct, Transactions};
pub use provider::{HttpProvider, ProviderError, WalletProvider, UNAUTHORIZED, USER_REJECTED};
pub use types::*;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use serde_json::{json, Value};

use crate::config::{validate_wallet_url, DappConfig, Network};
use crate::error::{DappError, Result};

/// Map a provider failure from a wallet prompt or transfer to a typed error.
pub(crate) fn wallet_error(err: ProviderError) -> DappError {
    match err {
        ProviderError::Rpc { code: USER_REJECTED, .. } => DappError::UserRejected,
        ProviderError::Rpc { code: UNAUTHORIZED, .. } => DappError::NotConnected,
        ProviderError::Unreachable(ref message) => {
            tracing::warn!(error = %message, "wallet endpoint unreachable");
            DappError::WalletUnavailable
        }
        ProviderError::Rpc { ref message, .. }
            if message.to_lowercase().contains("insufficient funds") =>
        {
            DappError::InsufficientFunds
        }
        other => DappError::Network(other.to_string()),
    }
}

/// Like `wallet_error`, but JSON-RPC errors that are not wallet prompts are contract failures.
pub(crate) fn contract_error(err: ProviderError) -> DappError {
    match wallet_error(err.clone()) {
        DappError::Network(_) => match err {
            ProviderError::Rpc { message, .. } => DappError::ContractCall(message),
            ProviderError::Transport(message) | ProviderError::Unreachable(message) => {
                DappError::Network(message)
            }
        },
        typed => typed,
    }
}

pub(crate) fn parse_hash(value: &Value) -> Result<B256> {
    value
        .as_str()
        .and_then(|s| B256::from_str(s).ok())
        .ok_or_else(|| DappError::Network(format!("Wallet returned an invalid transaction hash: {value}")))
}

fn parse_quantity(value: &Value) -> Result<U256> {
    let s = value
        .as_str()
        .ok_or_else(|| DappError::Network(format!("Expected a hex quantity, got {value}")))?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| DappError::Network(format!("Invalid hex quantity '{s}': {e}")))
}

fn parse_u64_quantity(value: &Value) -> Result<u64> {
    let q = parse_quantity(value)?;
    u64::try_from(q).map_err(|_| DappError::Network(format!("Quantity out of range: {q}")))
}

fn parse_accounts(value: &Value) -> Result<Vec<Address>> {
    let items = value
        .as_array()
        .ok_or_else(|| DappError::Network(format!("Expected an account list, got {value}")))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .and_then(|s| Address::from_str(s).ok())
                .ok_or_else(|| DappError::Network(format!("Invalid account in wallet response: {item}")))
        })
        .collect()
}

fn parse_receipt(value: &Value) -> Result<TransactionReceipt> {
    let transaction_hash = parse_hash(&value["transactionHash"])?;
    let block_number = match &value["blockNumber"] {
        Value::Null => None,
        v => Some(parse_u64_quantity(v)?),
    };
    // Pre-Byzantium receipts carry no status field.
    let success = match &value["status"] {
        Value::Null => true,
        v => parse_quantity(v)? != U256::ZERO,
    };
    Ok(TransactionReceipt {
        transaction_hash,
        block_number,
        success,
    })
}

/// A broadcast transaction whose receipt can be awaited.
pub struct PendingTransaction {
    hash: B256,
    provider: Arc<dyn WalletProvider>,
}

impl PendingTransaction {
    pub(crate) fn new(hash: B256, provider: Arc<dyn WalletProvider>) -> Self {
        Self { hash, provider }
    }

    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Poll `eth_getTransactionReceipt` until the transaction is mined.
    /// A reverted transaction is a `ContractCall` error. Transport failures
    /// are retried until `timeout`.
    pub async fn wait(
        &self,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt> {
        let started = tokio::time::Instant::now();
        loop {
            let value = match self
                .provider
                .request("eth_getTransactionReceipt", json!([self.hash.to_string()]))
                .await
            {
                Ok(value) => value,
                Err(e) if e.is_transient() => {
                    tracing::warn!(hash = %self.hash, error = %e, "receipt poll failed, retrying");
                    Value::Null
                }
                Err(e) => return Err(wallet_error(e)),
            };
            if !value.is_null() {
                let receipt = parse_receipt(&value)?;
                if !receipt.success {
                    return Err(DappError::ContractCall(format!(
                        "Transaction {} reverted",
                        self.hash
                    )));
                }
                tracing::info!(hash = %self.hash, block = ?receipt.block_number, "confirmed");
                return Ok(receipt);
            }
            if let Some(limit) = timeout {
                if started.elapsed() >= limit {
                    return Err(DappError::ConfirmationTimeout(self.hash));
                }
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

pub struct WalletGateway {
    provider: Option<Arc<dyn WalletProvider>>,
    network: Network,
    contract: Address,
    transfer_gas: u64,
}

impl WalletGateway {
    /// Connect to the configured JSON-RPC wallet endpoint.
    pub fn new(config: &DappConfig, allow_insecure: bool) -> anyhow::Result<Self> {
        let url = config.wallet_url()?;
        validate_wallet_url(&url, allow_insecure)?;
        Ok(Self::with_provider(
            Some(Arc::new(HttpProvider::new(url))),
            config,
        ))
    }

    /// Use an explicit provider, or `None` for "no wallet present".
    pub fn with_provider(provider: Option<Arc<dyn WalletProvider>>, config: &DappConfig) -> Self {
        Self {
            provider,
            network: config.network,
            contract: config.contract_address,
            transfer_gas: config.transfer_gas,
        }
    }

    fn provider(&self) -> Result<&Arc<dyn WalletProvider>> {
        self.provider.as_ref().ok_or(DappError::WalletUnavailable)
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn contract_address(&self) -> &Address {
        &self.contract
    }

    /// Accounts the wallet has already authorized (`eth_accounts`). Never prompts.
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        let value = self
            .provider()?
            .request("eth_accounts", json!([]))
            .await
            .map_err(wallet_error)?;
        parse_accounts(&value)
    }

    /// Like `accounts`, but failures are logged and reported as "no accounts".
    pub async fn authorized_accounts(&self) -> Vec<Address> {
        self.accounts().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "eth_accounts failed");
            Vec::new()
        })
    }

    /// Ask the wallet to authorize this client (`eth_requestAccounts`). May prompt the user.
    pub async fn request_authorization(&self) -> Result<Vec<Address>> {
        let value = self
            .provider()?
            .request("eth_requestAccounts", json!([]))
            .await
            .map_err(wallet_error)?;
        parse_accounts(&value)
    }

    /// Build a contract handle. `Signing` requires an authorized account.
    pub fn contract(&self, mode: AccessMode, account: Option<Address>) -> Result<ContractHandle> {
        let provider = self.provider()?.clone();
        if mode == AccessMode::Signing && account.is_none() {
            return Err(DappError::NotConnected);
        }
        Ok(ContractHandle::new(self.contract, mode, account, provider))
    }

    /// Re-attach to a transaction broadcast earlier, e.g. across GUI messages.
    pub fn pending(&self, hash: B256) -> Result<PendingTransaction> {
        Ok(PendingTransaction::new(hash, self.provider()?.clone()))
    }

    /// Submit a plain value transfer through the wallet.
    pub async fn send_native_transfer(
        &self,
        to: Address,
        from: Address,
        amount_wei: U256,
    ) -> Result<PendingTransaction> {
        let provider = self.provider()?;
        let params = json!([{
            "to": to.to_string(),
            "from": from.to_string(),
            "gas": format!("0x{:x}", self.transfer_gas),
            "value": format!("0x{amount_wei:x}"),
        }]);
        let value = provider
            .request("eth_sendTransaction", params)
            .await
            .map_err(wallet_error)?;
        let hash = parse_hash(&value)?;
        tracing::info!(%hash, %to, "native transfer submitted");
        Ok(PendingTransaction::new(hash, provider.clone()))
    }

    pub async fn balance(&self, address: &Address) -> Result<U256> {
        let value = self
            .provider()?
            .request("eth_getBalance", json!([address.to_string(), "latest"]))
            .await
            .map_err(wallet_error)?;
        parse_quantity(&value)
    }

    pub async fn chain_id(&self) -> Result<u64> {
        let value = self
            .provider()?
            .request("eth_chainId", json!([]))
            .await
            .map_err(wallet_error)?;
        parse_u64_quantity(&value)
    }

    pub async fn block_number(&self) -> Result<u64> {
        let value = self
            .provider()?
            .request("eth_blockNumber", json!([]))
            .await
            .map_err(wallet_error)?;
        parse_u64_quantity(&value)
    }

    pub async fn status(&self) -> Result<ChainStatus> {
        Ok(ChainStatus {
            network: self.network,
            chain_id: self.chain_id().await?,
            block_number: self.block_number().await?,
            wallet_url: self.provider()?.endpoint().to_string(),
            contract: self.contract,
        })
    }
}

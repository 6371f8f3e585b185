use std::time::Duration;

use alloy_primitives::{Address, B256, U256};

use crate::config::DappConfig;
use crate::error::{DappError, Result};
use crate::network::{
    AccessMode, ChainStatus, PendingTransaction, SubmitReceipt, TransferRecord, TransferRequest,
    WalletGateway,
};
use crate::store::LocalStore;

/// Async side of the transfer workflow: every wallet, contract and store call
/// goes through here. Holds no session state, so it can be shared behind an
/// `Arc` by the GUI's tasks.
pub struct TransferService {
    gateway: WalletGateway,
    store: LocalStore,
    poll_interval: Duration,
    confirm_timeout: Option<Duration>,
}

impl TransferService {
    pub fn new(gateway: WalletGateway, store: LocalStore, config: &DappConfig) -> Self {
        Self {
            gateway,
            store,
            poll_interval: config.poll_interval(),
            confirm_timeout: config.confirm_timeout(),
        }
    }

    pub fn gateway(&self) -> &WalletGateway {
        &self.gateway
    }

    pub fn is_wallet_available(&self) -> bool {
        self.gateway.is_available()
    }

    /// Accounts for the startup check. Only an absent or unreachable wallet is
    /// an error; any other failure is logged and reads as "no accounts".
    pub async fn authorized_accounts(&self) -> Result<Vec<Address>> {
        match self.gateway.accounts().await {
            Ok(accounts) => Ok(accounts),
            Err(DappError::WalletUnavailable) => Err(DappError::WalletUnavailable),
            Err(e) => {
                tracing::warn!(error = %e, "eth_accounts failed");
                Ok(Vec::new())
            }
        }
    }

    pub async fn request_authorization(&self) -> Result<Vec<Address>> {
        self.gateway.request_authorization().await
    }

    /// Broadcast the value transfer. Nothing has moved if this fails.
    pub async fn send_native_transfer(
        &self,
        from: Address,
        request: &TransferRequest,
    ) -> Result<PendingTransaction> {
        self.gateway
            .send_native_transfer(request.to, from, request.amount_wei)
            .await
    }

    /// Wait for the native transfer, record it on the contract and refresh the
    /// counter. Any failure here is `RecordFailed`, since value may have moved.
    pub async fn complete_transfer(
        &self,
        from: Address,
        request: &TransferRequest,
        native_tx: B256,
    ) -> Result<SubmitReceipt> {
        let record_tx = self
            .record_transfer(from, request, native_tx)
            .await
            .map_err(|e| {
                tracing::error!(%native_tx, error = %e, "transfer not recorded");
                DappError::RecordFailed {
                    native_tx,
                    reason: e.to_string(),
                }
            })?;

        let transaction_count = match self.sync_transaction_count().await {
            Ok(count) => count,
            Err(e) => {
                // The record is confirmed, so the log grew by exactly one.
                tracing::warn!(error = %e, "could not refresh transfer count");
                let count = self.stored_transaction_count().unwrap_or(0) + 1;
                if let Err(e) = self.store.set_transaction_count(count) {
                    tracing::warn!(error = %e, "could not persist transfer count");
                }
                count
            }
        };

        Ok(SubmitReceipt {
            native_tx,
            record_tx,
            transaction_count,
        })
    }

    async fn record_transfer(
        &self,
        from: Address,
        request: &TransferRequest,
        native_tx: B256,
    ) -> Result<B256> {
        self.gateway
            .pending(native_tx)?
            .wait(self.poll_interval, self.confirm_timeout)
            .await?;

        let contract = self.gateway.contract(AccessMode::Signing, Some(from))?;
        let pending = contract
            .add_to_blockchain(
                request.to,
                request.amount_wei,
                &request.message,
                &request.keyword,
            )
            .await?;
        tracing::info!(hash = %pending.hash(), "waiting for record confirmation");
        pending
            .wait(self.poll_interval, self.confirm_timeout)
            .await?;
        Ok(pending.hash())
    }

    pub async fn fetch_transactions(&self) -> Result<Vec<TransferRecord>> {
        let contract = self.gateway.contract(AccessMode::ReadOnly, None)?;
        let records = contract.get_all_transactions().await?;
        tracing::debug!(count = records.len(), "fetched transfers");
        Ok(records)
    }

    pub async fn fetch_transaction_count(&self) -> Result<u64> {
        let contract = self.gateway.contract(AccessMode::ReadOnly, None)?;
        contract.get_transaction_count().await
    }

    /// Read the on-chain counter and mirror it into the local store.
    pub async fn sync_transaction_count(&self) -> Result<u64> {
        let count = self.fetch_transaction_count().await?;
        self.store
            .set_transaction_count(count)
            .map_err(|e| DappError::Storage(format!("{e:#}")))?;
        Ok(count)
    }

    /// Last counter written to the local store, if readable.
    pub fn stored_transaction_count(&self) -> Option<u64> {
        self.store.transaction_count().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read stored transfer count");
            None
        })
    }

    pub async fn balance(&self, address: &Address) -> Result<U256> {
        self.gateway.balance(address).await
    }

    pub async fn status(&self) -> Result<ChainStatus> {
        self.gateway.status().await
    }
}

use std::sync::Arc;

use alloy_primitives::Address;

use crate::error::{DappError, Result};
use crate::network::{SubmitReceipt, TransferRecord, TransferRequest};
use crate::service::TransferService;
use crate::session::{FormField, Session};

/// Runs the session transitions and service calls in order, for callers that
/// handle one action at a time (the REPL and one-shot commands).
pub struct TransactionWorkflow {
    service: Arc<TransferService>,
    session: Session,
}

impl TransactionWorkflow {
    pub fn new(service: Arc<TransferService>) -> Self {
        let session = Session::new(service.stored_transaction_count());
        Self { service, session }
    }

    pub fn service(&self) -> &Arc<TransferService> {
        &self.service
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Startup check: adopt an already-authorized account without prompting.
    pub async fn check_if_wallet_is_connected(&mut self) -> Result<Option<Address>> {
        if !self.service.is_wallet_available() {
            return Err(DappError::WalletUnavailable);
        }
        self.session.begin_check()?;
        let accounts = match self.service.authorized_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                self.session.finish_check(&[]);
                return Err(e);
            }
        };
        let account = self.session.finish_check(&accounts);
        match account {
            Some(account) => {
                tracing::info!(%account, "wallet already authorized");
                self.refresh_quietly().await;
            }
            None => tracing::info!("no authorized accounts found"),
        }
        Ok(account)
    }

    pub async fn connect_wallet(&mut self) -> Result<Address> {
        self.session.begin_connect()?;
        let result = self.service.request_authorization().await;
        let account = self.session.finish_connect(result)?;
        tracing::info!(%account, "wallet connected");
        Ok(account)
    }

    pub fn handle_change(&mut self, field: FormField, value: impl Into<String>) {
        self.session.handle_change(field, value);
    }

    pub fn clear_form(&mut self) {
        self.session.clear_form();
    }

    /// Validate, transfer, record, then refresh the cached list.
    pub async fn send_transaction(&mut self) -> Result<SubmitReceipt> {
        let (from, request) = self.session.begin_submit()?;
        let result = self.submit(from, &request).await;
        self.session.finish_submit(&result);
        if result.is_ok() {
            if let Err(e) = self.get_all_transactions().await {
                tracing::warn!(error = %e, "could not refresh transfers after submit");
            }
        }
        result
    }

    async fn submit(&mut self, from: Address, request: &TransferRequest) -> Result<SubmitReceipt> {
        let pending = self.service.send_native_transfer(from, request).await?;
        self.session.native_submitted();
        self.service
            .complete_transfer(from, request, pending.hash())
            .await
    }

    /// Fetch the full transfer log and replace the cached list.
    pub async fn get_all_transactions(&mut self) -> Result<&[TransferRecord]> {
        let records = self.service.fetch_transactions().await?;
        self.session.replace_transactions(records);
        Ok(self.session.transactions())
    }

    pub async fn sync_transaction_count(&mut self) -> Result<u64> {
        let count = self.service.sync_transaction_count().await?;
        self.session.set_transaction_count(count);
        Ok(count)
    }

    async fn refresh_quietly(&mut self) {
        if let Err(e) = self.get_all_transactions().await {
            tracing::warn!(error = %e, "could not load transfers");
        }
        if let Err(e) = self.sync_transaction_count().await {
            tracing::warn!(error = %e, "could not sync transfer count");
        }
    }
}

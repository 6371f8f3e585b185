use crate::messages::Message;
use crate::state::InFlight;
use crate::App;
use iced::Task;
use krypt_core::error::{DappError, Result};

/// Rebuild a typed error from a message that crossed a `Task` boundary.
fn task_error(message: String) -> DappError {
    DappError::Other(anyhow::anyhow!(message))
}

impl App {
    // -- Update --

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // -- Wallet --
            Message::WalletChecked(Err(e)) => {
                self.session.finish_check(&[]);
                self.error_message = Some(e);
                Task::none()
            }

            Message::WalletChecked(Ok(accounts)) => {
                match self.session.finish_check(&accounts) {
                    Some(account) => {
                        tracing::info!(%account, "wallet already authorized");
                        self.refresh()
                    }
                    None => {
                        self.status_message =
                            Some("No authorized account. Connect your wallet.".into());
                        Task::none()
                    }
                }
            }

            Message::ConnectWallet => {
                let Some(service) = self.service.clone() else {
                    self.error_message = Some(DappError::WalletUnavailable.to_string());
                    return Task::none();
                };
                if let Err(e) = self.session.begin_connect() {
                    self.error_message = Some(e.to_string());
                    return Task::none();
                }
                self.error_message = None;
                self.status_message = Some("Waiting for wallet approval...".into());
                Task::perform(
                    async move { service.request_authorization().await },
                    |r: Result<_>| Message::WalletConnected(r.map_err(|e| e.to_string())),
                )
            }

            Message::WalletConnected(result) => {
                self.status_message = None;
                match self.session.finish_connect(result.map_err(task_error)) {
                    Ok(account) => {
                        tracing::info!(%account, "wallet connected");
                        self.success_message = Some(format!("Connected {account}"));
                        self.refresh()
                    }
                    Err(e) => {
                        self.error_message = Some(e.to_string());
                        Task::none()
                    }
                }
            }

            Message::CopyAddress => {
                if let Some(account) = self.session.account() {
                    if let Some(cb) = &mut self.clipboard {
                        match cb.set_text(account.to_string()) {
                            Ok(_) => self.status_message = Some("Address copied".into()),
                            Err(e) => self.error_message = Some(format!("Copy failed: {e}")),
                        }
                    } else {
                        self.error_message = Some("Clipboard not available".into());
                    }
                }
                Task::none()
            }

            // -- Form --
            Message::FieldChanged(field, value) => {
                self.session.handle_change(field, value);
                Task::none()
            }

            Message::ClearForm => {
                self.session.clear_form();
                Task::none()
            }

            // -- Send --
            Message::SendTransaction => {
                let Some(service) = self.service.clone() else {
                    self.error_message = Some(DappError::WalletUnavailable.to_string());
                    return Task::none();
                };
                let (from, request) = match self.session.begin_submit() {
                    Ok(submission) => submission,
                    Err(e) => {
                        self.error_message = Some(e.to_string());
                        return Task::none();
                    }
                };
                self.error_message = None;
                self.success_message = None;
                self.status_message = Some("Confirm the transfer in your wallet...".into());
                self.in_flight = Some(InFlight {
                    from,
                    request: request.clone(),
                });
                Task::perform(
                    async move {
                        let pending = service.send_native_transfer(from, &request).await?;
                        Ok::<_, DappError>(pending.hash())
                    },
                    |r: Result<_>| Message::NativeSent(r.map_err(|e| e.to_string())),
                )
            }

            Message::NativeSent(Ok(native_tx)) => {
                let (Some(service), Some(in_flight)) = (self.service.clone(), self.in_flight.clone())
                else {
                    return Task::none();
                };
                self.session.native_submitted();
                self.last_native_tx = Some(native_tx);
                self.status_message = Some(format!(
                    "Transfer {native_tx} sent. Waiting for confirmation and record..."
                ));
                Task::perform(
                    async move {
                        service
                            .complete_transfer(in_flight.from, &in_flight.request, native_tx)
                            .await
                    },
                    |r: Result<_>| Message::TransferFinished(r.map_err(|e| e.to_string())),
                )
            }

            Message::NativeSent(Err(e)) => {
                self.in_flight = None;
                self.status_message = None;
                self.session.finish_submit(&Err(task_error(e.clone())));
                self.error_message = Some(e);
                Task::none()
            }

            Message::TransferFinished(result) => {
                self.in_flight = None;
                self.status_message = None;
                let result = result.map_err(task_error);
                self.session.finish_submit(&result);
                match result {
                    Ok(receipt) => {
                        self.success_message = Some(format!(
                            "Transfer recorded. {} transfers on chain.",
                            receipt.transaction_count
                        ));
                        self.load_transfers()
                    }
                    Err(e) => {
                        self.error_message = Some(e.to_string());
                        Task::none()
                    }
                }
            }

            Message::OpenExplorer(hash) => {
                if let Some(url) = self.config.explorer_tx_url(&hash) {
                    if let Err(e) = open::that(&url) {
                        self.error_message = Some(format!("Could not open {url}: {e}"));
                    }
                }
                Task::none()
            }

            // -- Transfers --
            Message::RefreshTransfers => self.refresh(),

            Message::TransfersLoaded(result) => {
                self.refreshing = false;
                match result {
                    Ok(records) => self.session.replace_transactions(records),
                    Err(e) => self.error_message = Some(e),
                }
                Task::none()
            }

            Message::CountSynced(result) => {
                match result {
                    Ok(count) => self.session.set_transaction_count(count),
                    Err(e) => tracing::warn!(error = %e, "could not sync transfer count"),
                }
                Task::none()
            }
        }
    }

    /// Startup: adopt an already-authorized account without prompting.
    pub(crate) fn check_wallet(&mut self) -> Task<Message> {
        let Some(service) = self.service.clone() else {
            return Task::none();
        };
        if let Err(e) = self.session.begin_check() {
            tracing::warn!(error = %e, "wallet check skipped");
            return Task::none();
        }
        Task::perform(
            async move { service.authorized_accounts().await },
            |r: Result<_>| Message::WalletChecked(r.map_err(|e| e.to_string())),
        )
    }

    fn refresh(&mut self) -> Task<Message> {
        Task::batch([self.load_transfers(), self.sync_count()])
    }

    fn load_transfers(&mut self) -> Task<Message> {
        let Some(service) = self.service.clone() else {
            return Task::none();
        };
        self.refreshing = true;
        Task::perform(
            async move { service.fetch_transactions().await },
            |r: Result<_>| Message::TransfersLoaded(r.map_err(|e| e.to_string())),
        )
    }

    fn sync_count(&self) -> Task<Message> {
        let Some(service) = self.service.clone() else {
            return Task::none();
        };
        Task::perform(
            async move { service.sync_transaction_count().await },
            |r: Result<_>| Message::CountSynced(r.map_err(|e| e.to_string())),
        )
    }
}

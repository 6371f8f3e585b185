use std::path::PathBuf;

use anyhow::Context;

pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod network;
pub mod service;
pub mod session;
pub mod store;
pub mod workflow;

pub use commands::Command;
pub use config::{DappConfig, Network};
pub use error::DappError;
pub use network::{
    AccessMode, HttpProvider, SubmitReceipt, TransferRecord, TransferRequest, WalletGateway,
    WalletProvider,
};
pub use service::TransferService;
pub use session::{FormField, Phase, Session, TransferForm};
pub use store::LocalStore;
pub use workflow::TransactionWorkflow;

pub use alloy_primitives::{Address, B256, U256};

/// XDG-compliant data directory for the config file and local store.
/// Linux: `~/.local/share/krypt/`, macOS: `~/Library/Application Support/krypt/`
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Cannot determine data directory")?
        .join("krypt");
    Ok(dir)
}

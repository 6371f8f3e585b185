use alloy_primitives::{Address, B256, U256};
use serde::Serialize;

use crate::config::Network;

/// Read-only projection of one entry of the contract's transfer log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub sender: Address,
    pub receiver: Address,
    /// UTC display string derived from `timestamp_secs`.
    pub timestamp: String,
    pub timestamp_secs: u64,
    pub message: String,
    pub keyword: String,
    /// Ether decimal derived from `amount_wei`.
    pub amount: String,
    pub amount_wei: U256,
}

/// A submitted form after local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    pub amount_wei: U256,
    pub keyword: String,
    pub message: String,
}

/// Outcome of a fully confirmed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitReceipt {
    pub native_tx: B256,
    pub record_tx: B256,
    pub transaction_count: u64,
}

/// Minimal view of `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct ChainStatus {
    pub network: Network,
    pub chain_id: u64,
    pub block_number: u64,
    pub wallet_url: String,
    pub contract: Address,
}

/// Which capability a contract handle carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// `eth_call` only; no account needed.
    ReadOnly,
    /// May send state-changing transactions from the authorized account.
    Signing,
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::Signing => write!(f, "signing"),
        }
    }
}

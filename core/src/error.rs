//! Domain error type for wallet and contract operations.

use alloy_primitives::B256;
use thiserror::Error;

/// Typed error enum for the transfer workflow, so the view layer can match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
#[derive(Debug, Error)]
pub enum DappError {
    /// No wallet endpoint is configured.
    #[error("No wallet found. Start a wallet (e.g. Frame) or pass --rpc-url.")]
    WalletUnavailable,

    /// The user declined a wallet prompt (EIP-1193 code 4001).
    #[error("Request rejected in the wallet.")]
    UserRejected,

    /// The wallet reported that the account cannot cover value + gas.
    #[error("Insufficient funds for this transfer.")]
    InsufficientFunds,

    /// A signing operation was attempted without an authorized account.
    #[error("Wallet not connected. Run 'connect' first.")]
    NotConnected,

    /// Empty or malformed destination address.
    #[error("{0}")]
    InvalidRecipient(String),

    /// Empty, malformed, zero or out-of-range amount.
    #[error("{0}")]
    InvalidAmount(String),

    /// Reverted transaction, undecodable return data or a failed `eth_call`.
    #[error("Contract call failed: {0}")]
    ContractCall(String),

    /// The native transfer went through but recording it on the contract failed.
    #[error("Transfer {native_tx} was sent, but recording it failed: {reason}")]
    RecordFailed { native_tx: B256, reason: String },

    /// No receipt arrived within the configured confirmation timeout.
    #[error("Timed out waiting for confirmation of {0}")]
    ConfirmationTimeout(B256),

    /// Transport or JSON-RPC failure.
    #[error("{0}")]
    Network(String),

    /// Local store or config file failure.
    #[error("{0}")]
    Storage(String),

    /// Operation not allowed in the current session phase.
    #[error("{0}")]
    InvalidState(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `std::result::Result<T, DappError>`.
pub type Result<T> = std::result::Result<T, DappError>;

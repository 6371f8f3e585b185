use krypt_core::{Address, FormField, SubmitReceipt, TransferRecord, B256};

// -- Messages --

#[derive(Debug, Clone)]
pub(crate) enum Message {
    // Wallet
    WalletChecked(Result<Vec<Address>, String>),
    ConnectWallet,
    WalletConnected(Result<Vec<Address>, String>),
    CopyAddress,

    // Form
    FieldChanged(FormField, String),
    ClearForm,

    // Send
    SendTransaction,
    NativeSent(Result<B256, String>),
    TransferFinished(Result<SubmitReceipt, String>),
    OpenExplorer(B256),

    // Transfers
    RefreshTransfers,
    TransfersLoaded(Result<Vec<TransferRecord>, String>),
    CountSynced(Result<u64, String>),
}

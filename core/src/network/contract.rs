/// Binding for the deployed `Transactions` contract.
use std::sync::Arc;

use alloy_primitives::{hex, Address, U256};
use alloy_sol_types::{sol, SolCall};
use serde_json::json;

use super::provider::WalletProvider;
use super::types::{AccessMode, TransferRecord};
use super::{contract_error, parse_hash, PendingTransaction};
use crate::display;
use crate::error::{DappError, Result};

sol! {
    #![sol(all_derives)]
    interface Transactions {
        struct TransferStruct {
            address sender;
            address receiver;
            uint amount;
            string message;
            uint256 timestamp;
            string keyword;
        }

        function addToBlockchain(address payable receiver, uint amount, string memory message, string memory keyword) external;
        function getAllTransactions() external view returns (TransferStruct[] memory);
        function getTransactionCount() external view returns (uint256);
    }
}

pub use Transactions::TransferStruct;

impl From<TransferStruct> for TransferRecord {
    fn from(entry: TransferStruct) -> Self {
        let timestamp_secs = entry.timestamp.saturating_to::<u64>();
        Self {
            sender: entry.sender,
            receiver: entry.receiver,
            timestamp: display::format_timestamp(timestamp_secs),
            timestamp_secs,
            message: entry.message,
            keyword: entry.keyword,
            amount: display::wei_to_ether(entry.amount),
            amount_wei: entry.amount,
        }
    }
}

/// A contract handle bound to one access mode. Built by `WalletGateway::contract`.
pub struct ContractHandle {
    address: Address,
    mode: AccessMode,
    account: Option<Address>,
    provider: Arc<dyn WalletProvider>,
}

impl ContractHandle {
    pub(super) fn new(
        address: Address,
        mode: AccessMode,
        account: Option<Address>,
        provider: Arc<dyn WalletProvider>,
    ) -> Self {
        Self {
            address,
            mode,
            account,
            provider,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Append a record to the on-chain log. Requires a signing handle.
    pub async fn add_to_blockchain(
        &self,
        receiver: Address,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<PendingTransaction> {
        if self.mode != AccessMode::Signing {
            return Err(DappError::InvalidState(
                "addToBlockchain needs a signing handle".into(),
            ));
        }
        let from = self.account.ok_or(DappError::NotConnected)?;

        let data = Transactions::addToBlockchainCall {
            receiver,
            amount,
            message: message.to_string(),
            keyword: keyword.to_string(),
        }
        .abi_encode();

        let params = json!([{
            "from": from.to_string(),
            "to": self.address.to_string(),
            "data": hex::encode_prefixed(data),
        }]);
        let value = self
            .provider
            .request("eth_sendTransaction", params)
            .await
            .map_err(contract_error)?;
        let hash = parse_hash(&value)?;
        tracing::info!(%hash, "addToBlockchain submitted");
        Ok(PendingTransaction::new(hash, self.provider.clone()))
    }

    /// Every transfer recorded so far, in contract order.
    pub async fn get_all_transactions(&self) -> Result<Vec<TransferRecord>> {
        let raw = self
            .call(Transactions::getAllTransactionsCall {}.abi_encode())
            .await?;
        let decoded = Transactions::getAllTransactionsCall::abi_decode_returns(&raw, true)
            .map_err(|e| DappError::ContractCall(format!("Cannot decode getAllTransactions: {e}")))?;
        Ok(decoded._0.into_iter().map(TransferRecord::from).collect())
    }

    pub async fn get_transaction_count(&self) -> Result<u64> {
        let raw = self
            .call(Transactions::getTransactionCountCall {}.abi_encode())
            .await?;
        let decoded = Transactions::getTransactionCountCall::abi_decode_returns(&raw, true)
            .map_err(|e| {
                DappError::ContractCall(format!("Cannot decode getTransactionCount: {e}"))
            })?;
        u64::try_from(decoded._0)
            .map_err(|_| DappError::ContractCall("Transaction count out of range".into()))
    }

    /// `eth_call` against the latest block.
    async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let mut tx = json!({
            "to": self.address.to_string(),
            "data": hex::encode_prefixed(data),
        });
        if let Some(from) = self.account {
            tx["from"] = json!(from.to_string());
        }
        let value = self
            .provider
            .request("eth_call", json!([tx, "latest"]))
            .await
            .map_err(contract_error)?;
        let encoded = value
            .as_str()
            .ok_or_else(|| DappError::ContractCall(format!("Unexpected eth_call result: {value}")))?;
        let bytes = hex::decode(encoded)
            .map_err(|e| DappError::ContractCall(format!("Invalid eth_call hex: {e}")))?;
        if bytes.is_empty() {
            return Err(DappError::ContractCall(format!(
                "No contract code at {}. Check --contract.",
                self.address
            )));
        }
        Ok(bytes)
    }
}

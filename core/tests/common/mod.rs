//! Scripted in-memory wallet shared by the integration tests.
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use alloy_primitives::{hex, Address, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde_json::{json, Value};

use krypt_core::network::{ProviderError, Transactions, TransferStruct, WalletProvider};
use krypt_core::{DappConfig, LocalStore, TransactionWorkflow, TransferService, WalletGateway};

pub const ALICE: Address = Address::new([0xa1; 20]);
pub const BOB: Address = Address::new([0xb0; 20]);

pub struct MockState {
    /// Answer to `eth_accounts`.
    pub accounts: Vec<Address>,
    /// Answer to `eth_requestAccounts`.
    pub authorize: Result<Vec<Address>, ProviderError>,
    /// Error for the next plain value transfer.
    pub native_error: Option<ProviderError>,
    /// Error for the next `addToBlockchain` transaction.
    pub record_error: Option<ProviderError>,
    /// Receipts never arrive.
    pub never_mine: bool,
    /// Mined receipts report `status: 0x0`.
    pub revert: bool,
    /// Number of receipt polls that fail with a transport error first.
    pub receipt_failures: usize,
    pub records: Vec<TransferStruct>,
    pub calls: Vec<String>,
    pub native_transfers: Vec<(Address, U256)>,
    next_hash: u8,
}

pub struct MockWallet {
    pub contract: Address,
    pub state: Mutex<MockState>,
}

impl MockWallet {
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            state: Mutex::new(MockState {
                accounts: Vec::new(),
                authorize: Ok(vec![ALICE]),
                native_error: None,
                record_error: None,
                never_mine: false,
                revert: false,
                receipt_failures: 0,
                records: Vec::new(),
                calls: Vec::new(),
                native_transfers: Vec::new(),
                next_hash: 0,
            }),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<String> {
        self.with(|s| s.calls.clone())
    }

    pub fn called(&self, method: &str) -> bool {
        self.calls().iter().any(|m| m == method)
    }

    pub fn seed_record(&self, sender: Address, receiver: Address, wei: u64, keyword: &str) {
        self.with(|s| {
            let timestamp = U256::from(1_700_000_000u64 + s.records.len() as u64);
            s.records.push(TransferStruct {
                sender,
                receiver,
                amount: U256::from(wei),
                message: String::new(),
                timestamp,
                keyword: keyword.to_string(),
            });
        });
    }

    fn send_transaction(&self, state: &mut MockState, tx: &Value) -> Result<Value, ProviderError> {
        let from = tx["from"]
            .as_str()
            .and_then(|s| Address::from_str(s).ok())
            .ok_or_else(|| rpc(-32602, "missing from"))?;

        if let Some(data) = tx["data"].as_str() {
            if let Some(err) = state.record_error.take() {
                return Err(err);
            }
            let bytes = hex::decode(data).map_err(|e| rpc(-32602, &e.to_string()))?;
            let call = Transactions::addToBlockchainCall::abi_decode(&bytes, true)
                .map_err(|e| rpc(3, &e.to_string()))?;
            let timestamp = U256::from(1_700_000_000u64 + state.records.len() as u64);
            state.records.push(TransferStruct {
                sender: from,
                receiver: call.receiver,
                amount: call.amount,
                message: call.message,
                timestamp,
                keyword: call.keyword,
            });
        } else {
            if let Some(err) = state.native_error.take() {
                return Err(err);
            }
            let to = tx["to"]
                .as_str()
                .and_then(|s| Address::from_str(s).ok())
                .ok_or_else(|| rpc(-32602, "missing to"))?;
            let value = tx["value"]
                .as_str()
                .and_then(|s| U256::from_str_radix(s.trim_start_matches("0x"), 16).ok())
                .unwrap_or_default();
            state.native_transfers.push((to, value));
        }

        state.next_hash += 1;
        Ok(json!(B256::with_last_byte(state.next_hash).to_string()))
    }

    fn call(&self, state: &MockState, tx: &Value) -> Result<Value, ProviderError> {
        let data = tx["data"].as_str().unwrap_or_default();
        let bytes = hex::decode(data).map_err(|e| rpc(-32602, &e.to_string()))?;
        let selector: [u8; 4] = bytes
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| rpc(-32602, "short calldata"))?;

        let encoded = if selector == Transactions::getAllTransactionsCall::SELECTOR {
            Transactions::getAllTransactionsCall::abi_encode_returns(&(state.records.clone(),))
        } else if selector == Transactions::getTransactionCountCall::SELECTOR {
            Transactions::getTransactionCountCall::abi_encode_returns(&(U256::from(
                state.records.len(),
            ),))
        } else {
            return Err(rpc(3, "execution reverted"));
        };
        Ok(json!(hex::encode_prefixed(encoded)))
    }
}

pub fn rpc(code: i64, message: &str) -> ProviderError {
    ProviderError::Rpc {
        code,
        message: message.to_string(),
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method.to_string());
        match method {
            "eth_accounts" => Ok(json!(state
                .accounts
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>())),
            "eth_requestAccounts" => state
                .authorize
                .clone()
                .map(|accounts| json!(accounts.iter().map(|a| a.to_string()).collect::<Vec<_>>())),
            "eth_sendTransaction" => self.send_transaction(&mut state, &params[0]),
            "eth_call" => {
                if params[0]["to"].as_str() != Some(self.contract.to_string().as_str()) {
                    return Ok(json!("0x"));
                }
                self.call(&state, &params[0])
            }
            "eth_getTransactionReceipt" => {
                if state.receipt_failures > 0 {
                    state.receipt_failures -= 1;
                    return Err(ProviderError::Transport("connection reset by peer".into()));
                }
                if state.never_mine {
                    return Ok(Value::Null);
                }
                let status = if state.revert { "0x0" } else { "0x1" };
                Ok(json!({
                    "transactionHash": params[0],
                    "blockNumber": "0x10",
                    "status": status,
                }))
            }
            "eth_getBalance" => Ok(json!("0xde0b6b3a7640000")),
            "eth_chainId" => Ok(json!("0x7a69")),
            "eth_blockNumber" => Ok(json!("0x10")),
            other => Err(rpc(-32601, &format!("method {other} not found"))),
        }
    }

    fn endpoint(&self) -> &str {
        "mock://wallet"
    }
}

pub fn test_config() -> DappConfig {
    DappConfig {
        poll_interval_ms: 10,
        ..DappConfig::default()
    }
}

pub fn workflow_with(wallet: Option<Arc<MockWallet>>, store: LocalStore) -> TransactionWorkflow {
    workflow_with_config(wallet, store, &test_config())
}

pub fn workflow_with_config(
    wallet: Option<Arc<MockWallet>>,
    store: LocalStore,
    config: &DappConfig,
) -> TransactionWorkflow {
    let provider = wallet.map(|w| w as Arc<dyn WalletProvider>);
    let gateway = WalletGateway::with_provider(provider, config);
    TransactionWorkflow::new(Arc::new(TransferService::new(gateway, store, config)))
}

pub fn mock_wallet() -> Arc<MockWallet> {
    Arc::new(MockWallet::new(test_config().contract_address))
}

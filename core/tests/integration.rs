/// Integration tests against a local dev node (anvil/hardhat on 127.0.0.1:8545)
/// with the `Transactions` contract deployed at the default address.
/// Run with: cargo test -- --ignored
use std::sync::Arc;

use krypt_core::commands::Command;
use krypt_core::{
    DappConfig, FormField, LocalStore, Network, TransactionWorkflow, TransferService,
    WalletGateway,
};

fn local_config() -> DappConfig {
    DappConfig {
        network: Network::Local,
        poll_interval_ms: 250,
        confirm_timeout_secs: Some(60),
        ..DappConfig::default()
    }
}

fn local_workflow(dir: &tempfile::TempDir) -> TransactionWorkflow {
    let config = local_config();
    let gateway = WalletGateway::new(&config, false).expect("failed to build gateway");
    let store =
        LocalStore::open_at(&dir.path().join("storage.db")).expect("failed to open store");
    TransactionWorkflow::new(Arc::new(TransferService::new(gateway, store, &config)))
}

#[tokio::test]
#[ignore]
async fn local_node_status() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let workflow = local_workflow(&dir);
    let status = workflow
        .service()
        .status()
        .await
        .expect("failed to query status");
    assert!(status.chain_id > 0);
}

#[tokio::test]
#[ignore]
async fn local_node_send_and_list() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut workflow = local_workflow(&dir);

    let account = workflow.connect_wallet().await.expect("connect failed");
    let before = workflow
        .sync_transaction_count()
        .await
        .expect("failed to read count");

    workflow.handle_change(FormField::AddressTo, account.to_string());
    workflow.handle_change(FormField::Amount, "0.001");
    workflow.handle_change(FormField::Keyword, "integration");
    workflow.handle_change(FormField::Message, "self transfer");
    let receipt = workflow.send_transaction().await.expect("submit failed");
    assert_eq!(receipt.transaction_count, before + 1);

    let records = workflow.session().transactions();
    let last = records.last().expect("record missing");
    assert_eq!(last.sender, account);
    assert_eq!(last.keyword, "integration");
    assert_eq!(last.amount, "0.001");
}

#[tokio::test]
#[ignore]
async fn local_node_commands_json() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut workflow = local_workflow(&dir);

    let out = Command::parse("count")
        .unwrap()
        .execute(&mut workflow, true)
        .await
        .expect("count failed");
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(parsed["transaction_count"].is_u64());

    let out = Command::parse("transfers")
        .unwrap()
        .execute(&mut workflow, true)
        .await
        .expect("transfers failed");
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(parsed.is_array());
}

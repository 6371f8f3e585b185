use anyhow::Result;
use serde_json::json;

use super::help::help_text;
use super::Command;
use crate::display;
use crate::error::DappError;
use crate::session::FormField;
use crate::workflow::TransactionWorkflow;

impl Command {
    /// Execute a command against the workflow and return the output string.
    pub async fn execute(
        &self,
        workflow: &mut TransactionWorkflow,
        json_output: bool,
    ) -> Result<String> {
        match self {
            Command::Connect => {
                let account = workflow.connect_wallet().await?;
                if json_output {
                    Ok(json!({ "account": account.to_string() }).to_string())
                } else {
                    Ok(format!("Connected: {account}"))
                }
            }

            Command::Account => {
                let account = workflow.session().account().copied();
                if json_output {
                    Ok(json!({ "account": account.map(|a| a.to_string()) }).to_string())
                } else {
                    Ok(match account {
                        Some(a) => a.to_string(),
                        None => "Not connected. Run 'connect' first.".to_string(),
                    })
                }
            }

            Command::Set { field, value } => {
                workflow.handle_change(*field, value.clone());
                Ok(format!("{field} = {value}"))
            }

            Command::Form => {
                let form = workflow.session().form();
                if json_output {
                    Ok(json!({
                        "addressTo": form.address_to,
                        "amount": form.amount,
                        "keyword": form.keyword,
                        "message": form.message,
                    })
                    .to_string())
                } else {
                    Ok(display::format_form(form))
                }
            }

            Command::Clear => {
                workflow.clear_form();
                Ok("Form cleared.".to_string())
            }

            Command::Submit => submit_form(workflow, json_output).await,

            Command::Transfer {
                to,
                amount,
                keyword,
                message,
            } => {
                workflow.handle_change(FormField::AddressTo, to.clone());
                workflow.handle_change(FormField::Amount, amount.clone());
                workflow.handle_change(FormField::Keyword, keyword.clone());
                workflow.handle_change(FormField::Message, message.clone());
                submit_form(workflow, json_output).await
            }

            Command::Transfers => {
                let records = workflow.get_all_transactions().await?;
                if json_output {
                    Ok(display::format_transfers_json(records))
                } else {
                    Ok(display::format_transfers(records))
                }
            }

            Command::Count => {
                let count = workflow.sync_transaction_count().await?;
                if json_output {
                    Ok(json!({ "transaction_count": count }).to_string())
                } else {
                    Ok(format!("Transfers on chain: {count}"))
                }
            }

            Command::Balance => {
                let account = *workflow
                    .session()
                    .account()
                    .ok_or(DappError::NotConnected)?;
                let wei = workflow.service().balance(&account).await?;
                if json_output {
                    Ok(display::format_balance_json(wei))
                } else {
                    Ok(display::format_ether(wei))
                }
            }

            Command::Status => {
                let status = workflow.service().status().await?;
                if json_output {
                    Ok(json!({
                        "network": status.network.to_string(),
                        "chain_id": status.chain_id,
                        "block_number": status.block_number,
                        "wallet_url": status.wallet_url,
                        "contract": status.contract.to_string(),
                    })
                    .to_string())
                } else {
                    Ok(display::format_status(&status))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}

async fn submit_form(workflow: &mut TransactionWorkflow, json_output: bool) -> Result<String> {
    let form = workflow.session().form().clone();
    let receipt = workflow.send_transaction().await?;
    // The form is cleared on success; the snapshot still validates.
    let request = form.validate()?;

    if json_output {
        Ok(json!({
            "native_tx": receipt.native_tx.to_string(),
            "record_tx": receipt.record_tx.to_string(),
            "transaction_count": receipt.transaction_count,
            "amount_wei": request.amount_wei.to_string(),
            "amount_eth": display::wei_to_ether(request.amount_wei),
            "recipient": request.to.to_string(),
            "keyword": request.keyword,
        })
        .to_string())
    } else {
        Ok(display::format_receipt(
            &receipt,
            request.amount_wei,
            &request.to,
        ))
    }
}

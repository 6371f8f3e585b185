/// Command definitions and parsing for the REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use crate::display;
use crate::session::{FormField, TransferForm};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask the wallet to authorize this client
    Connect,
    /// Show the connected account
    Account,
    /// Set one form field: set <field> <value>
    Set { field: FormField, value: String },
    /// Show the pending form
    Form,
    /// Reset the form
    Clear,
    /// Send the filled-in form
    Submit,
    /// Fill the whole form and submit: transfer <to> <amount> <keyword> [message]
    Transfer {
        to: String,
        amount: String,
        keyword: String,
        message: String,
    },
    /// List transfers recorded on the contract
    Transfers,
    /// Show the on-chain transfer count
    Count,
    /// Show the connected account's balance
    Balance,
    /// Show chain and wallet endpoint info
    Status,
    /// Print help
    Help { command: Option<String> },
    /// Exit
    Exit,
}

impl Command {
    /// Returns a confirmation prompt if this command moves value.
    /// `form` is the current form, used by `submit`.
    pub fn confirmation_prompt(&self, form: &TransferForm) -> Option<String> {
        let prompt = |to: &str, amount: &str, keyword: &str| {
            let amount = display::parse_ether_amount(amount)
                .map(display::format_ether)
                .unwrap_or_else(|_| format!("{amount} ETH"));
            if keyword.is_empty() {
                format!("Send {amount} to {to}?")
            } else {
                format!("Send {amount} to {to} (keyword '{keyword}')?")
            }
        };

        match self {
            Command::Submit => Some(prompt(
                form.address_to.trim(),
                &form.amount,
                form.keyword.trim(),
            )),
            Command::Transfer {
                to,
                amount,
                keyword,
                ..
            } => Some(prompt(to, amount, keyword)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_requires_confirmation() {
        let cmd = Command::Transfer {
            to: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".into(),
            amount: "1.5".into(),
            keyword: "rent".into(),
            message: String::new(),
        };
        let prompt = cmd.confirmation_prompt(&TransferForm::default()).unwrap();
        assert!(prompt.contains("1.5 ETH"));
        assert!(prompt.contains("'rent'"));
    }

    #[test]
    fn submit_prompt_uses_form() {
        let form = TransferForm {
            address_to: "0xabc".into(),
            amount: "2".into(),
            keyword: String::new(),
            message: String::new(),
        };
        let prompt = Command::Submit.confirmation_prompt(&form).unwrap();
        assert_eq!(prompt, "Send 2 ETH to 0xabc?");
    }

    #[test]
    fn reads_need_no_confirmation() {
        let form = TransferForm::default();
        assert!(Command::Transfers.confirmation_prompt(&form).is_none());
        assert!(Command::Connect.confirmation_prompt(&form).is_none());
        assert!(Command::Balance.confirmation_prompt(&form).is_none());
    }
}

use anyhow::{anyhow, bail, Result};

use super::Command;
use crate::session::FormField;

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (input.to_lowercase(), ""),
        };
        let arg = (!rest.is_empty()).then_some(rest);

        match cmd.as_str() {
            "connect" => Ok(Command::Connect),

            "account" | "acc" => Ok(Command::Account),

            "set" => {
                let (name, value) = match arg.map(|a| a.split_once(char::is_whitespace)) {
                    Some(Some((name, value))) => (name, value.trim()),
                    Some(None) => (rest, ""),
                    None => bail!("Missing field. Usage: set <field> <value>"),
                };
                let field = name.parse::<FormField>().map_err(|e| anyhow!(e))?;
                Ok(Command::Set {
                    field,
                    value: value.to_string(),
                })
            }

            "form" => Ok(Command::Form),

            "clear" | "reset" => Ok(Command::Clear),

            "submit" => Ok(Command::Submit),

            "transfer" | "send" => {
                const USAGE: &str = "Usage: transfer <address> <amount> <keyword> [message]";
                let (to, rest) = next_token(rest);
                let (amount, rest) = next_token(rest);
                let (keyword, message) = next_token(rest);
                if to.is_empty() {
                    bail!("Missing recipient. {USAGE}");
                }
                if amount.is_empty() {
                    bail!("Missing amount. {USAGE}");
                }
                if keyword.is_empty() {
                    bail!("Missing keyword. {USAGE}");
                }
                Ok(Command::Transfer {
                    to: to.to_string(),
                    amount: amount.to_string(),
                    keyword: keyword.to_string(),
                    message: message.to_string(),
                })
            }

            "transfers" | "txs" | "show_transfers" => Ok(Command::Transfers),

            "count" => Ok(Command::Count),

            "balance" | "bal" => Ok(Command::Balance),

            "status" => Ok(Command::Status),

            "help" | "?" => Ok(Command::Help {
                command: arg.map(|s| s.to_lowercase()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

/// Split off the first whitespace-delimited word; the remainder keeps its
/// inner spacing but loses leading whitespace.
fn next_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (input, ""),
    }
}

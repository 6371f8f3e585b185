#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("connect") => {
            "connect\n  Ask the wallet to authorize this client.\n  The wallet may show an approval prompt.".to_string()
        }
        Some("account") | Some("acc") => {
            "account\n  Show the connected account.\n  Alias: acc".to_string()
        }
        Some("set") => {
            "set <field> <value>\n  Set one field of the transfer form.\n  Fields: addressTo (alias: to), amount, keyword, message.\n  Amount is in ETH (e.g. '0.01').\n  Example: set message thanks for lunch".to_string()
        }
        Some("form") => "form\n  Show the transfer form.".to_string(),
        Some("clear") | Some("reset") => {
            "clear\n  Reset every form field.\n  Alias: reset".to_string()
        }
        Some("submit") => {
            "submit\n  Send the form: transfer the amount, then record it on the contract.\n  Waits for both confirmations.".to_string()
        }
        Some("transfer") | Some("send") => {
            "transfer <address> <amount> <keyword> [message]\n  Fill the whole form and submit it.\n  Example: transfer 0x7099...79C8 0.05 coffee thanks!\n  Alias: send".to_string()
        }
        Some("transfers") | Some("txs") | Some("show_transfers") => {
            "transfers\n  List every transfer recorded on the contract, newest first.\n  Alias: txs".to_string()
        }
        Some("count") => {
            "count\n  Show the number of transfers recorded on chain.".to_string()
        }
        Some("balance") | Some("bal") => {
            "balance\n  Show the connected account's ETH balance.\n  Alias: bal".to_string()
        }
        Some("status") => {
            "status\n  Show chain ID, latest block, wallet endpoint and contract.".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list."),
        None => {
            "Available commands:\n\
             \n\
             \x20 connect          Connect the wallet\n\
             \x20 account          Show the connected account\n\
             \x20 set              Set a form field\n\
             \x20 form             Show the transfer form\n\
             \x20 clear            Reset the form\n\
             \x20 submit           Send the form\n\
             \x20 transfer         Fill the form and send in one step\n\
             \x20 transfers        List recorded transfers\n\
             \x20 count            Show the on-chain transfer count\n\
             \x20 balance          Show account balance\n\
             \x20 status           Show chain status\n\
             \x20 help [cmd]       Show help for a command\n\
             \x20 exit             Exit\n\
             \n\
             Type 'help <command>' for detailed help on a specific command."
                .to_string()
        }
    }
}

/// REPL shell: Reedline-based interactive transfer session.
use anyhow::Result;
use krypt_core::commands::Command;
use krypt_core::config::DappConfig;
use krypt_core::display::short_address;
use krypt_core::{Address, DappError, TransactionWorkflow};
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

pub async fn run_repl(config: &DappConfig, mut workflow: TransactionWorkflow) -> Result<()> {
    println!("Krypt v{}", env!("CARGO_PKG_VERSION"));
    println!("Network:  {}", config.network);
    if let Ok(url) = config.wallet_url() {
        println!("Wallet:   {url}");
    }
    println!("Contract: {}", config.contract_address);
    println!();

    match workflow.check_if_wallet_is_connected().await {
        Ok(Some(account)) => println!("Wallet connected. Account: {account}"),
        Ok(None) => println!("No authorized account yet. Type 'connect' to connect your wallet."),
        Err(DappError::WalletUnavailable) => {
            eprintln!("{}", DappError::WalletUnavailable);
        }
        Err(e) => eprintln!("Error: {e}"),
    }
    if let Some(count) = workflow.session().transaction_count() {
        println!("Transfers on chain: {count}");
    }
    println!("Type 'help' for a list of commands.");
    println!();

    let mut shown_account = workflow.session().account().copied();
    let mut prompt = build_prompt(shown_account.as_ref());

    let commands: Vec<String> = vec![
        "connect".into(),
        "account".into(),
        "acc".into(),
        "set".into(),
        "addressTo".into(),
        "amount".into(),
        "keyword".into(),
        "message".into(),
        "form".into(),
        "clear".into(),
        "submit".into(),
        "transfer".into(),
        "send".into(),
        "transfers".into(),
        "txs".into(),
        "count".into(),
        "balance".into(),
        "bal".into(),
        "status".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        let sends = matches!(cmd, Command::Submit | Command::Transfer { .. });
                        if let Some(prompt_msg) =
                            cmd.confirmation_prompt(workflow.session().form())
                        {
                            if !prompt_confirm(&prompt_msg) {
                                println!("Cancelled.");
                                continue;
                            }
                        }
                        if sends {
                            println!("Waiting for the wallet and for confirmations...");
                        }
                        match cmd.execute(&mut workflow, false).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => {
                                eprintln!("Error: {e}");
                            }
                        }

                        let account = workflow.session().account().copied();
                        if account != shown_account {
                            shown_account = account;
                            prompt = build_prompt(shown_account.as_ref());
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}

fn build_prompt(account: Option<&Address>) -> DefaultPrompt {
    let label = match account {
        Some(a) => format!("[krypt {}]", short_address(a)),
        None => "[krypt not connected]".to_string(),
    };
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(label),
        DefaultPromptSegment::Empty,
    )
}

fn prompt_confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}

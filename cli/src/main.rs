mod repl;

use anyhow::{bail, Context, Result};
use clap::Parser;
use krypt_core::commands::Command;
use krypt_core::config::{default_config_path, DappConfig, Network};
use krypt_core::{Address, DappError, LocalStore, TransactionWorkflow, TransferService, WalletGateway};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "krypt", about = "Krypt: send ETH and keep a message ledger on chain", version)]
pub(crate) struct Cli {
    /// Config file (default: <data dir>/krypt/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,

    /// Use the Frame wallet on 127.0.0.1:1248 (default)
    #[arg(long)]
    frame: bool,

    /// Use a local dev node on 127.0.0.1:8545
    #[arg(long)]
    local: bool,

    /// Custom wallet JSON-RPC endpoint
    #[arg(long, env = "KRYPT_RPC_URL")]
    rpc_url: Option<String>,

    /// Address of the Transactions contract
    #[arg(long, env = "KRYPT_CONTRACT")]
    contract: Option<String>,

    /// Allow plain HTTP to non-loopback endpoints
    #[arg(long)]
    insecure: bool,

    /// Give up waiting for a confirmation after this many seconds
    #[arg(long)]
    confirm_timeout: Option<u64>,

    /// Write the effective settings back to the config file
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Check whether the user explicitly set any network flag on the CLI.
    fn has_explicit_network_flags(&self) -> bool {
        self.frame || self.local || self.rpc_url.is_some()
    }

    /// Validate that at most one network flag is set.
    fn validate_network_flags(&self) -> Result<()> {
        let count = self.frame as u8 + self.local as u8 + self.rpc_url.is_some() as u8;
        if count > 1 {
            bail!("Conflicting network flags. Use only one of --frame, --local, or --rpc-url.");
        }
        Ok(())
    }

    fn network_override(&self) -> (Network, Option<String>) {
        if let Some(url) = &self.rpc_url {
            (Network::Custom, Some(url.clone()))
        } else if self.local {
            (Network::Local, None)
        } else {
            (Network::Frame, None)
        }
    }

    /// Apply CLI flags on top of the stored config. Warns when a flag
    /// overrides a different stored value.
    fn resolve_config(&self, stored: &DappConfig) -> Result<DappConfig> {
        let mut config = stored.clone();

        if self.has_explicit_network_flags() {
            let (network, custom_url) = self.network_override();
            if network != stored.network || custom_url != stored.custom_url {
                eprintln!(
                    "Warning: CLI network flag ({network}) overrides stored network ({})",
                    stored.network
                );
            }
            config.network = network;
            config.custom_url = custom_url;
        }

        if let Some(raw) = &self.contract {
            let address = Address::from_str(raw.trim())
                .with_context(|| format!("Invalid contract address '{raw}'"))?;
            if address != stored.contract_address {
                eprintln!(
                    "Warning: --contract {address} overrides stored contract ({})",
                    stored.contract_address
                );
            }
            config.contract_address = address;
        }

        if let Some(secs) = self.confirm_timeout {
            config.confirm_timeout_secs = Some(secs);
        }

        Ok(config)
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.validate_network_flags()?;

    let config_path = cli.config_path()?;
    let stored = DappConfig::load(&config_path)?;
    let config = cli.resolve_config(&stored)?;
    if cli.save_config {
        config.save(&config_path)?;
        eprintln!("Saved settings to {}", config_path.display());
    }

    let workflow = build_workflow(&cli, &config)?;

    if let Some(cmd_str) = &cli.cmd {
        // One-shot mode
        run_oneshot(&cli, workflow, cmd_str).await
    } else {
        // REPL mode
        repl::run_repl(&config, workflow).await
    }
}

fn build_workflow(cli: &Cli, config: &DappConfig) -> Result<TransactionWorkflow> {
    let gateway = WalletGateway::new(config, cli.insecure)?;
    let store = LocalStore::open()?;
    let service = TransferService::new(gateway, store, config);
    Ok(TransactionWorkflow::new(Arc::new(service)))
}

async fn run_oneshot(cli: &Cli, mut workflow: TransactionWorkflow, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }

    match workflow.check_if_wallet_is_connected().await {
        Ok(_) | Err(DappError::WalletUnavailable) => {}
        Err(e) => return Err(e.into()),
    }

    let output = command.execute(&mut workflow, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}

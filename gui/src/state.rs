use anyhow::{bail, Context};
use krypt_core::config::{DappConfig, Network};
use krypt_core::{Address, TransferRequest};
use std::str::FromStr;

/// A submission between "native transfer sent" and "record confirmed".
#[derive(Debug, Clone)]
pub(crate) struct InFlight {
    pub(crate) from: Address,
    pub(crate) request: TransferRequest,
}

/// Command-line flags understood by the desktop app.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct LaunchOptions {
    pub(crate) local: bool,
    pub(crate) rpc_url: Option<String>,
    pub(crate) contract: Option<String>,
    pub(crate) insecure: bool,
}

impl LaunchOptions {
    pub(crate) fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut options = Self {
            rpc_url: std::env::var("KRYPT_RPC_URL").ok(),
            contract: std::env::var("KRYPT_CONTRACT").ok(),
            ..Self::default()
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--local" => options.local = true,
                "--insecure" => options.insecure = true,
                "--rpc-url" => options.rpc_url = args.next(),
                "--contract" => options.contract = args.next(),
                other => tracing::warn!(arg = other, "ignoring unknown argument"),
            }
        }
        options
    }

    pub(crate) fn apply(&self, mut config: DappConfig) -> anyhow::Result<DappConfig> {
        if self.local && self.rpc_url.is_some() {
            bail!("Conflicting network flags. Use only one of --local or --rpc-url.");
        }
        if let Some(url) = &self.rpc_url {
            config.network = Network::Custom;
            config.custom_url = Some(url.clone());
        } else if self.local {
            config.network = Network::Local;
        }
        if let Some(raw) = &self.contract {
            config.contract_address = Address::from_str(raw.trim())
                .with_context(|| format!("Invalid contract address '{raw}'"))?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_override_stored_network() {
        let options = LaunchOptions {
            local: true,
            ..LaunchOptions::default()
        };
        let config = options.apply(DappConfig::default()).unwrap();
        assert_eq!(config.network, Network::Local);

        let options = LaunchOptions {
            rpc_url: Some("https://rpc.example.com".into()),
            ..LaunchOptions::default()
        };
        let config = options.apply(DappConfig::default()).unwrap();
        assert_eq!(config.network, Network::Custom);
        assert_eq!(config.custom_url.as_deref(), Some("https://rpc.example.com"));
    }

    #[test]
    fn conflicting_flags_rejected() {
        let options = LaunchOptions {
            local: true,
            rpc_url: Some("http://127.0.0.1:8545".into()),
            ..LaunchOptions::default()
        };
        assert!(options.apply(DappConfig::default()).is_err());
    }

    #[test]
    fn parses_flag_values() {
        let options = LaunchOptions::from_args(args(&[
            "--insecure",
            "--contract",
            "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
        ]));
        assert!(options.insecure);
        let config = options.apply(DappConfig::default()).unwrap();
        assert_eq!(
            config.contract_address.to_string(),
            "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
        );
    }
}

/// Client configuration: wallet endpoint, contract address and confirmation policy.
///
/// Stored as JSON in the data directory; CLI flags override individual fields.
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::{address, Address, B256};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::{Host, Url};

/// Frame desktop wallet's local EIP-1193 endpoint.
pub const FRAME_URL: &str = "http://127.0.0.1:1248";
/// anvil / hardhat default endpoint with unlocked dev accounts.
pub const LOCAL_URL: &str = "http://127.0.0.1:8545";
/// First contract deployed by the default dev account on a fresh anvil/hardhat node.
pub const DEFAULT_CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
/// Gas for a plain value transfer (0x5208).
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Frame (or any wallet bridge) on its default port.
    #[default]
    Frame,
    /// Local dev node with unlocked accounts.
    Local,
    Custom,
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Frame => write!(f, "frame"),
            Network::Local => write!(f, "local"),
            Network::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DappConfig {
    pub network: Network,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default = "default_contract")]
    pub contract_address: Address,
    #[serde(default = "default_transfer_gas")]
    pub transfer_gas: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// `None` waits for confirmation indefinitely.
    #[serde(default)]
    pub confirm_timeout_secs: Option<u64>,
    /// Block explorer base URL, e.g. `https://sepolia.etherscan.io`.
    #[serde(default)]
    pub explorer_url: Option<String>,
}

fn default_contract() -> Address {
    DEFAULT_CONTRACT
}

fn default_transfer_gas() -> u64 {
    NATIVE_TRANSFER_GAS
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            custom_url: None,
            contract_address: DEFAULT_CONTRACT,
            transfer_gas: NATIVE_TRANSFER_GAS,
            poll_interval_ms: default_poll_interval_ms(),
            confirm_timeout_secs: None,
            explorer_url: None,
        }
    }
}

impl DappConfig {
    /// Resolve the wallet endpoint URL for the selected network.
    pub fn wallet_url(&self) -> Result<String> {
        match self.network {
            Network::Frame => Ok(FRAME_URL.to_string()),
            Network::Local => Ok(LOCAL_URL.to_string()),
            Network::Custom => self
                .custom_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Custom network requires a wallet URL")),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn confirm_timeout(&self) -> Option<Duration> {
        self.confirm_timeout_secs.map(Duration::from_secs)
    }

    /// Explorer page for a transaction hash, if an explorer is configured.
    pub fn explorer_tx_url(&self, hash: &B256) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|base| format!("{}/tx/{hash}", base.trim_end_matches('/')))
    }

    /// Load the config from `path`, falling back to defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}

/// Default config location inside the data directory.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(crate::data_dir()?.join(CONFIG_FILE))
}

/// Accept HTTPS anywhere, plain HTTP only for loopback hosts unless `allow_insecure` is set.
pub fn validate_wallet_url(url: &str, allow_insecure: bool) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid wallet URL: {url}"))?;
    match parsed.scheme() {
        "https" => Ok(()),
        "http" => {
            let loopback = match parsed.host() {
                Some(Host::Domain(d)) => d.eq_ignore_ascii_case("localhost"),
                Some(Host::Ipv4(ip)) => ip.is_loopback(),
                Some(Host::Ipv6(ip)) => ip.is_loopback(),
                None => false,
            };
            if loopback || allow_insecure {
                return Ok(());
            }
            bail!("Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections.");
        }
        other => bail!("Invalid wallet URL scheme '{other}': {url}\nExpected http(s)://"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_urls() {
        let mut config = DappConfig::default();
        assert_eq!(config.wallet_url().unwrap(), FRAME_URL);
        config.network = Network::Local;
        assert_eq!(config.wallet_url().unwrap(), LOCAL_URL);
        config.network = Network::Custom;
        assert!(config.wallet_url().is_err());
        config.custom_url = Some("https://rpc.example.com".into());
        assert_eq!(config.wallet_url().unwrap(), "https://rpc.example.com");
    }

    #[test]
    fn loopback_http_allowed() {
        assert!(validate_wallet_url("http://127.0.0.1:1248", false).is_ok());
        assert!(validate_wallet_url("http://localhost:8545", false).is_ok());
        assert!(validate_wallet_url("http://[::1]:8545", false).is_ok());
    }

    #[test]
    fn remote_http_needs_insecure() {
        assert!(validate_wallet_url("http://10.0.0.5:8545", false).is_err());
        assert!(validate_wallet_url("http://10.0.0.5:8545", true).is_ok());
        assert!(validate_wallet_url("https://rpc.example.com", false).is_ok());
    }

    #[test]
    fn bad_scheme_rejected() {
        assert!(validate_wallet_url("ws://127.0.0.1:8545", true).is_err());
        assert!(validate_wallet_url("not a url", true).is_err());
    }

    #[test]
    fn explorer_link() {
        let hash = B256::repeat_byte(0xab);
        assert_eq!(DappConfig::default().explorer_tx_url(&hash), None);
        let config = DappConfig {
            explorer_url: Some("https://sepolia.etherscan.io/".into()),
            ..DappConfig::default()
        };
        assert_eq!(
            config.explorer_tx_url(&hash).unwrap(),
            format!("https://sepolia.etherscan.io/tx/{hash}")
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DappConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, DappConfig::default());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = DappConfig {
            network: Network::Local,
            confirm_timeout_secs: Some(90),
            ..DappConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(DappConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"network":"local"}"#).unwrap();
        let config = DappConfig::load(&path).unwrap();
        assert_eq!(config.network, Network::Local);
        assert_eq!(config.contract_address, DEFAULT_CONTRACT);
        assert_eq!(config.transfer_gas, NATIVE_TRANSFER_GAS);
        assert_eq!(config.confirm_timeout_secs, None);
    }
}

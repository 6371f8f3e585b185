/// Output formatting: ether denomination conversion and display helpers.
///
/// Ether uses 18 decimal places (wei). 1 ETH = 10^18 wei.
use alloy_primitives::{Address, U256};

use crate::network::{ChainStatus, SubmitReceipt, TransferRecord};
use crate::session::{FormField, TransferForm};

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;
const ETHER_DECIMALS: usize = 18;

fn wei_per_ether() -> U256 {
    U256::from(WEI_PER_ETHER)
}

/// Convert wei to an exact ether string with trailing zeros trimmed.
/// Examples: 1_500_000_000_000_000_000 -> "1.5", 0 -> "0", 1 -> "0.000000000000000001"
#[must_use]
pub fn wei_to_ether(wei: U256) -> String {
    let whole = wei / wei_per_ether();
    // always below 10^18, so it fits a u64
    let frac = (wei % wei_per_ether()).to::<u64>();
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:018}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Format a wei amount for display.
#[must_use]
pub fn format_ether(wei: U256) -> String {
    format!("{} ETH", wei_to_ether(wei))
}

/// Parse a human-readable ether amount into wei.
/// Accepts: "1.5" -> 1.5 * 10^18, "1" -> 10^18, ".5" -> 0.5 * 10^18.
/// The amount is taken as-is; no scaling other than the 10^18 unit factor.
#[must_use = "parsing result should be checked"]
pub fn parse_ether_amount(input: &str) -> Result<U256, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }

    if input.starts_with('-') {
        return Err("Amount must be positive".to_string());
    }

    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(whole) || !digits_only(frac) || (whole.is_empty() && frac.is_empty()) {
        return Err(format!(
            "Invalid amount '{input}'. Use ether units like '1.5' or '0.001'."
        ));
    }

    if frac.len() > ETHER_DECIMALS {
        return Err("Too many decimal places. Ether supports up to 18.".to_string());
    }

    let whole_wei = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| "Amount too large".to_string())?
    };

    let frac_wei = if frac.is_empty() {
        U256::ZERO
    } else {
        // Pad to 18 digits
        let padded = format!("{frac:0<18}");
        U256::from_str_radix(&padded, 10)
            .map_err(|_| format!("Invalid fractional part: '{frac}'"))?
    };

    whole_wei
        .checked_mul(wei_per_ether())
        .and_then(|w| w.checked_add(frac_wei))
        .ok_or_else(|| "Amount too large".to_string())
}

/// Render on-chain seconds as a UTC timestamp.
#[must_use]
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Shorten an address to `0x1234...abcd` for prompts and headers.
#[must_use]
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Format the recorded transfers, newest first.
#[must_use]
pub fn format_transfers(records: &[TransferRecord]) -> String {
    if records.is_empty() {
        return "No transfers recorded yet.".to_string();
    }

    let mut lines = Vec::with_capacity(records.len() * 2);
    for r in records.iter().rev() {
        lines.push(format!(
            "{}  {} -> {}  {} ETH  #{}",
            r.timestamp,
            short_address(&r.sender),
            short_address(&r.receiver),
            r.amount,
            r.keyword,
        ));
        if !r.message.is_empty() {
            lines.push(format!("    \"{}\"", r.message));
        }
    }
    lines.join("\n")
}

#[must_use]
pub fn format_transfers_json(records: &[TransferRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

/// Format the result of a completed submission.
#[must_use]
pub fn format_receipt(receipt: &SubmitReceipt, amount_wei: U256, to: &Address) -> String {
    format!(
        "Transfer recorded!\n  Transfer tx: {}\n  Record tx:   {}\n  Amount:      {} -> {}\n  Total transfers on chain: {}",
        receipt.native_tx,
        receipt.record_tx,
        format_ether(amount_wei),
        to,
        receipt.transaction_count,
    )
}

/// Format the pending transfer form, one field per line.
#[must_use]
pub fn format_form(form: &TransferForm) -> String {
    FormField::ALL
        .iter()
        .map(|field| {
            let value = form.get(*field);
            let shown = if value.is_empty() { "(empty)" } else { value };
            format!("  {:<10} {}", field.name(), shown)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format chain status for display.
#[must_use]
pub fn format_status(status: &ChainStatus) -> String {
    format!(
        "  Network:   {}\n  Chain ID:  {}\n  Block:     {}\n  Wallet:    {}\n  Contract:  {}",
        status.network, status.chain_id, status.block_number, status.wallet_url, status.contract,
    )
}

/// Format balance as JSON.
#[must_use]
pub fn format_balance_json(wei: U256) -> String {
    serde_json::json!({
        "balance_wei": wei.to_string(),
        "balance_eth": wei_to_ether(wei),
    })
    .to_string()
}

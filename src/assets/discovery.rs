//! Token balance discovery
//!
//! Off-protocol helper that scans a catalog of candidate tokens and reports
//! the ones a holder actually owns. Its output is what callers hand to the
//! release path as the explicit token list.

use crate::assets::ledger::AssetLedger;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A non-zero token balance found during discovery
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalanceEntry {
    pub token: Address,
    pub symbol: String,
    pub decimals: u8,
    /// Raw balance in the token's smallest unit
    pub amount: u128,
    /// Decimal-adjusted balance, e.g. `"1.5"`
    pub display: String,
}

/// Render `amount` with `decimals` fractional digits, trimming trailing zeros
pub fn format_units(amount: u128, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let digits = format!("{:0>width$}", amount, width = decimals as usize + 1);
    let (whole, fraction) = digits.split_at(digits.len() - decimals as usize);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Scan `candidates` and return entries with a non-zero balance for `holder`
///
/// Tokens the ledger has no metadata for are skipped with a warning rather
/// than failing the whole scan.
pub fn discover<L: AssetLedger + ?Sized>(
    ledger: &L,
    holder: &Address,
    candidates: &[Address],
) -> Vec<TokenBalanceEntry> {
    let mut found: Vec<TokenBalanceEntry> = Vec::new();
    for token in candidates {
        if found.iter().any(|e| e.token == *token) {
            continue;
        }
        let Some(metadata) = ledger.token_metadata(token) else {
            log::warn!("No metadata for candidate token {}, skipping", token);
            continue;
        };
        let amount = ledger.token_balance(token, holder);
        if amount == 0 {
            continue;
        }
        found.push(TokenBalanceEntry {
            token: *token,
            display: format_units(amount, metadata.decimals),
            symbol: metadata.symbol,
            decimals: metadata.decimals,
            amount,
        });
    }
    log::debug!(
        "Discovered {} of {} candidate token(s) for {}",
        found.len(),
        candidates.len(),
        holder
    );
    found
}

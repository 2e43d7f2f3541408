//! Asset transfer executor
//!
//! Moves a holder's base currency (in full or a fixed amount) and the full
//! balance of each explicitly listed token to a destination. Tokens are
//! never discovered here: only identifiers in the list are touched, and
//! those with a zero balance are skipped.
//!
//! Execution is planned first and then applied as one ledger batch, so a
//! request that cannot be satisfied (an exact base amount above the
//! balance, a token credit that would overflow) leaves every balance as it
//! was.

use crate::assets::ledger::{Asset, AssetLedger, LedgerError, TransferEvent};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Executor errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Insufficient base balance: have {have}, need {need}")]
    InsufficientBase { have: u128, need: u128 },
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// How much of the base currency to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseAmount {
    /// The entire balance
    All,
    /// Exactly this amount; fails if the balance is lower
    Exact(u128),
}

/// One token moved by the executor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub token: Address,
    pub amount: u128,
}

/// Outcome of an executor run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReport {
    /// Base currency moved (0 if nothing was moved)
    pub base_amount: u128,
    /// Tokens moved with their amounts, in list order
    pub tokens: Vec<TokenTransfer>,
    /// Listed tokens skipped because the holder had no balance
    pub skipped: Vec<Address>,
}

impl TransferReport {
    /// Identifiers of the tokens actually moved
    pub fn token_ids(&self) -> Vec<Address> {
        self.tokens.iter().map(|t| t.token).collect()
    }
}

/// Moves assets out of a single holder
pub struct AssetTransferExecutor<'a, L: AssetLedger + ?Sized> {
    ledger: &'a mut L,
    holder: Address,
}

impl<'a, L: AssetLedger + ?Sized> AssetTransferExecutor<'a, L> {
    /// Create an executor acting for `holder`
    pub fn new(ledger: &'a mut L, holder: Address) -> Self {
        Self { ledger, holder }
    }

    /// Compute what would move without touching the ledger
    pub fn plan(&self, base: BaseAmount, tokens: &[Address]) -> Result<TransferReport, ExecutorError> {
        let balance = self.ledger.base_balance(&self.holder);
        let base_amount = match base {
            BaseAmount::All => balance,
            BaseAmount::Exact(need) if need > balance => {
                return Err(ExecutorError::InsufficientBase {
                    have: balance,
                    need,
                })
            }
            BaseAmount::Exact(amount) => amount,
        };

        let mut report = TransferReport {
            base_amount,
            ..Default::default()
        };
        for token in tokens {
            let seen = report.tokens.iter().any(|t| t.token == *token)
                || report.skipped.contains(token);
            if seen {
                continue;
            }
            match self.ledger.token_balance(token, &self.holder) {
                0 => report.skipped.push(*token),
                amount => report.tokens.push(TokenTransfer {
                    token: *token,
                    amount,
                }),
            }
        }
        Ok(report)
    }

    /// Plan and apply the transfer to `to`
    pub fn execute(
        &mut self,
        to: &Address,
        base: BaseAmount,
        tokens: &[Address],
    ) -> Result<(TransferReport, Vec<TransferEvent>), ExecutorError> {
        let report = self.plan(base, tokens)?;

        let mut moves = Vec::with_capacity(report.tokens.len() + 1);
        if report.base_amount > 0 {
            moves.push((Asset::Base, report.base_amount));
        }
        moves.extend(
            report
                .tokens
                .iter()
                .map(|t| (Asset::Token(t.token), t.amount)),
        );
        let events = if moves.is_empty() {
            Vec::new()
        } else {
            self.ledger.transfer_all(&self.holder, to, &moves)?
        };

        for token in &report.skipped {
            log::debug!("Skipping token {} with zero balance", token);
        }

        log::info!(
            "Moved {} base and {} token(s) from {} to {}",
            report.base_amount,
            report.tokens.len(),
            self.holder,
            to
        );

        Ok((report, events))
    }
}

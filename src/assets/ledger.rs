//! Balance and transfer provider for custodied assets
//!
//! The vault never owns balances itself: it asks an [`AssetLedger`] what a
//! holder owns and instructs it to move funds. [`InMemoryLedger`] is the
//! reference implementation with a base-currency book and ERC-20 style
//! token books.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Maximum number of transfer events kept in the ledger history
const MAX_HISTORY: usize = 100;

/// Ledger-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Invalid amount: amount must be greater than 0")]
    InvalidAmount,
    #[error("Invalid address: cannot transfer to self")]
    SelfTransfer,
    #[error("Token not found: {0}")]
    TokenNotFound(Address),
    #[error("Token already exists: {0}")]
    TokenAlreadyExists(Address),
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid decimals: must be 0-36")]
    InvalidDecimals,
    #[error("Balance overflow")]
    Overflow,
}

/// Asset being moved: the base currency or a token identified by address
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "token", rename_all = "snake_case")]
pub enum Asset {
    Base,
    Token(Address),
}

/// Token metadata as reported by the ledger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Token symbol (e.g., "USDC")
    pub symbol: String,
    /// Decimal places used for display
    pub decimals: u8,
}

impl TokenMetadata {
    /// Create new token metadata with validation
    pub fn new(symbol: String, decimals: u8) -> Result<Self, LedgerError> {
        if symbol.is_empty() || symbol.len() > 10 {
            return Err(LedgerError::InvalidSymbol);
        }
        if decimals > 36 {
            return Err(LedgerError::InvalidDecimals);
        }
        Ok(Self { symbol, decimals })
    }
}

/// Transfer event (emitted when an asset moves)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferEvent {
    pub asset: Asset,
    pub from: Address,
    pub to: Address,
    pub amount: u128,
    pub timestamp: DateTime<Utc>,
}

/// Read and move balances on behalf of a holder
pub trait AssetLedger {
    /// Base-currency balance of `holder`
    fn base_balance(&self, holder: &Address) -> u128;

    /// Balance of `token` held by `holder`; unknown tokens read as zero
    fn token_balance(&self, token: &Address, holder: &Address) -> u128;

    /// Symbol and decimals of `token`, if the ledger knows it
    fn token_metadata(&self, token: &Address) -> Option<TokenMetadata>;

    /// Move `amount` of the base currency
    fn transfer_base(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError>;

    /// Move `amount` of `token`
    fn transfer_token(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError>;

    /// Balance of any asset
    fn balance(&self, asset: &Asset, holder: &Address) -> u128 {
        match asset {
            Asset::Base => self.base_balance(holder),
            Asset::Token(token) => self.token_balance(token, holder),
        }
    }

    /// Move `amount` of any asset
    fn transfer(
        &mut self,
        asset: &Asset,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError> {
        match asset {
            Asset::Base => self.transfer_base(from, to, amount),
            Asset::Token(token) => self.transfer_token(token, from, to, amount),
        }
    }

    /// Move every `(asset, amount)` pair from `from` to `to`, all or nothing
    ///
    /// Moves are applied in order. If one fails, the moves already applied
    /// are reversed before the error is returned.
    fn transfer_all(
        &mut self,
        from: &Address,
        to: &Address,
        moves: &[(Asset, u128)],
    ) -> Result<Vec<TransferEvent>, LedgerError> {
        let mut events = Vec::with_capacity(moves.len());
        for (asset, amount) in moves {
            match self.transfer(asset, from, to, *amount) {
                Ok(event) => events.push(event),
                Err(e) => {
                    for done in events.iter().rev() {
                        if let Err(undo) = self.transfer(&done.asset, to, from, done.amount) {
                            log::error!(
                                "Failed to reverse {:?} of {} from {}: {}",
                                done.asset,
                                done.amount,
                                to,
                                undo
                            );
                        }
                    }
                    return Err(e);
                }
            }
        }
        Ok(events)
    }
}

/// Balances of one token
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TokenBook {
    metadata: TokenMetadata,
    balances: HashMap<Address, u128>,
}

/// In-memory ledger holding the base currency and any number of tokens
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    base: HashMap<Address, u128>,
    tokens: HashMap<Address, TokenBook>,
    /// Transfer history (last 100)
    history: Vec<TransferEvent>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token under `address`
    pub fn register_token(
        &mut self,
        address: Address,
        symbol: String,
        decimals: u8,
    ) -> Result<(), LedgerError> {
        if self.tokens.contains_key(&address) {
            return Err(LedgerError::TokenAlreadyExists(address));
        }
        let metadata = TokenMetadata::new(symbol, decimals)?;

        log::info!(
            "Token registered: {} ({} decimals) at {}",
            metadata.symbol,
            metadata.decimals,
            address
        );

        self.tokens.insert(
            address,
            TokenBook {
                metadata,
                balances: HashMap::new(),
            },
        );
        Ok(())
    }

    /// List registered token addresses
    pub fn tokens(&self) -> Vec<Address> {
        self.tokens.keys().copied().collect()
    }

    /// Credit `amount` of `asset` to `holder` (deposits and funding)
    pub fn credit(
        &mut self,
        asset: &Asset,
        holder: &Address,
        amount: u128,
    ) -> Result<u128, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let balances = match asset {
            Asset::Base => &mut self.base,
            Asset::Token(token) => {
                &mut self
                    .tokens
                    .get_mut(token)
                    .ok_or(LedgerError::TokenNotFound(*token))?
                    .balances
            }
        };
        let entry = balances.entry(*holder).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(*entry)
    }

    /// Recent transfer events
    pub fn history(&self) -> &[TransferEvent] {
        &self.history
    }

    /// Check that every move in a batch would succeed, in order
    fn check_batch(
        &self,
        from: &Address,
        to: &Address,
        moves: &[(Asset, u128)],
    ) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }

        // (sender, receiver) balances after the moves checked so far
        let mut pending: HashMap<Asset, (u128, u128)> = HashMap::new();
        for (asset, amount) in moves {
            if *amount == 0 {
                return Err(LedgerError::InvalidAmount);
            }
            if let Asset::Token(token) = asset {
                if !self.tokens.contains_key(token) {
                    return Err(LedgerError::TokenNotFound(*token));
                }
            }
            let (have, received) = pending
                .entry(*asset)
                .or_insert_with(|| (self.balance(asset, from), self.balance(asset, to)));
            if *have < *amount {
                return Err(LedgerError::InsufficientBalance {
                    have: *have,
                    need: *amount,
                });
            }
            *received = received.checked_add(*amount).ok_or(LedgerError::Overflow)?;
            *have -= *amount;
        }
        Ok(())
    }

    fn record(&mut self, event: TransferEvent) -> TransferEvent {
        self.history.push(event.clone());
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        event
    }
}

/// Debit `from` and credit `to` inside one balance map
fn move_balance(
    balances: &mut HashMap<Address, u128>,
    from: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), LedgerError> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }
    if from == to {
        return Err(LedgerError::SelfTransfer);
    }

    let have = balances.get(from).copied().unwrap_or(0);
    if have < amount {
        return Err(LedgerError::InsufficientBalance { have, need: amount });
    }
    let to_balance = balances.get(to).copied().unwrap_or(0);
    let credited = to_balance
        .checked_add(amount)
        .ok_or(LedgerError::Overflow)?;

    balances.insert(*from, have - amount);
    balances.insert(*to, credited);
    Ok(())
}

impl AssetLedger for InMemoryLedger {
    fn base_balance(&self, holder: &Address) -> u128 {
        self.base.get(holder).copied().unwrap_or(0)
    }

    fn token_balance(&self, token: &Address, holder: &Address) -> u128 {
        self.tokens
            .get(token)
            .and_then(|book| book.balances.get(holder))
            .copied()
            .unwrap_or(0)
    }

    fn token_metadata(&self, token: &Address) -> Option<TokenMetadata> {
        self.tokens.get(token).map(|book| book.metadata.clone())
    }

    fn transfer_base(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError> {
        move_balance(&mut self.base, from, to, amount)?;
        Ok(self.record(TransferEvent {
            asset: Asset::Base,
            from: *from,
            to: *to,
            amount,
            timestamp: Utc::now(),
        }))
    }

    fn transfer_token(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError> {
        let book = self
            .tokens
            .get_mut(token)
            .ok_or(LedgerError::TokenNotFound(*token))?;
        move_balance(&mut book.balances, from, to, amount)?;
        Ok(self.record(TransferEvent {
            asset: Asset::Token(*token),
            from: *from,
            to: *to,
            amount,
            timestamp: Utc::now(),
        }))
    }

    fn transfer_all(
        &mut self,
        from: &Address,
        to: &Address,
        moves: &[(Asset, u128)],
    ) -> Result<Vec<TransferEvent>, LedgerError> {
        self.check_batch(from, to, moves)?;
        moves
            .iter()
            .map(|(asset, amount)| self.transfer(asset, from, to, *amount))
            .collect()
    }
}

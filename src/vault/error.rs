//! Protocol error taxonomy
//!
//! Every failure is local to the call that produced it: no state changes
//! when an operation returns an error, and the caller may retry with
//! corrected input.

use crate::assets::{ExecutorError, LedgerError};
use crate::vault::verifier::VerificationReport;
use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors related to vault operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Invalid threshold: {threshold} is not within [1, {heirs}]")]
    InvalidThreshold { threshold: usize, heirs: usize },
    #[error("Duplicate heir: {0}")]
    DuplicateHeir(Address),
    #[error("Invalid identity: the zero address cannot be {0}")]
    NullIdentity(&'static str),
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(Address),
    #[error(
        "Insufficient signatures: found {found} distinct heir signature(s), need {needed} \
         ({} duplicate, {} foreign, {} malformed)",
        .report.duplicates().len(),
        .report.foreign().len(),
        .report.malformed_count()
    )]
    InsufficientSignatures {
        found: usize,
        needed: usize,
        report: VerificationReport,
    },
    #[error("Invalid signature: none of {submitted} signature(s) recovered to a heir")]
    InvalidSignature {
        submitted: usize,
        report: VerificationReport,
    },
    #[error("Insufficient ETH: have {have}, need {need}")]
    InsufficientEth { have: u128, need: u128 },
    #[error("Lock not elapsed: release allowed at {unlocks_at} ({remaining_secs}s remaining)")]
    LockNotElapsed {
        unlocks_at: DateTime<Utc>,
        remaining_secs: u64,
    },
    #[error("Unauthorized: {caller} may not {action}")]
    Unauthorized {
        caller: Address,
        action: &'static str,
    },
    #[error("Replayed nonce: signatures were collected for nonce {presented}, current nonce is {current}")]
    ReplayedNonce { presented: u64, current: u64 },
    #[error("Vault is not armed")]
    NotArmed,
    #[error("Vault is already armed for {0}")]
    AlreadyArmed(Address),
    #[error("Configuration cannot change while a release is armed")]
    ConfigLocked,
    #[error("Vault not found: {0}")]
    VaultNotFound(Address),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<ExecutorError> for VaultError {
    fn from(e: ExecutorError) -> Self {
        match e {
            ExecutorError::InsufficientBase { have, need } => VaultError::InsufficientEth { have, need },
            ExecutorError::Ledger(e) => VaultError::Ledger(e),
        }
    }
}

impl VaultError {
    /// Short machine-readable tag for this error
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::InvalidThreshold { .. } => "InvalidThreshold",
            VaultError::DuplicateHeir(_) => "DuplicateHeir",
            VaultError::NullIdentity(_) => "NullIdentity",
            VaultError::InvalidRecipient(_) => "InvalidRecipient",
            VaultError::InsufficientSignatures { .. } => "InsufficientSignatures",
            VaultError::InvalidSignature { .. } => "InvalidSignature",
            VaultError::InsufficientEth { .. } => "InsufficientETH",
            VaultError::LockNotElapsed { .. } => "LockNotElapsed",
            VaultError::Unauthorized { .. } => "Unauthorized",
            VaultError::ReplayedNonce { .. } => "ReplayedNonce",
            VaultError::NotArmed => "NotArmed",
            VaultError::AlreadyArmed(_) => "AlreadyArmed",
            VaultError::ConfigLocked => "ConfigLocked",
            VaultError::VaultNotFound(_) => "VaultNotFound",
            VaultError::Ledger(_) => "LedgerError",
        }
    }

    /// Verification diagnostics, for signature failures
    pub fn report(&self) -> Option<&VerificationReport> {
        match self {
            VaultError::InsufficientSignatures { report, .. }
            | VaultError::InvalidSignature { report, .. } => Some(report),
            _ => None,
        }
    }
}

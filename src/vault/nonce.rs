//! Replay-scoping counter
//!
//! Every authorization message embeds the current nonce, so signatures
//! collected for one arm cycle stop verifying once the nonce moves on.

use serde::{Deserialize, Serialize};

/// Monotonic counter; starts at 0, only ever advances by 1
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonceLedger {
    value: u64,
}

impl NonceLedger {
    /// Start at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nonce
    pub fn current(&self) -> u64 {
        self.value
    }

    /// Advance by exactly one and return the new value
    pub fn advance(&mut self) -> u64 {
        self.value += 1;
        self.value
    }

    /// The nonce before the last advance, if any
    pub fn previous(&self) -> Option<u64> {
        self.value.checked_sub(1)
    }
}

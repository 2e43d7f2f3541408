//! Arm / cancel / release state machine
//!
//! ```text
//!            arm (quorum)             release (delay elapsed)
//!   Idle ───────────────► Armed ───────────────────────────► Released
//!    ▲                      │                                   │
//!    └──────── cancel ──────┘          arm (fresh nonce) ◄──────┘
//! ```
//!
//! `Released` accepts a new arm exactly like `Idle`; it only remembers the
//! last completed release.

use crate::assets::TokenTransfer;
use crate::vault::error::VaultError;
use alloy_primitives::Address;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A pending release, alive only while the vault is armed
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArmRequest {
    pub destination: Address,
    pub armed_at: DateTime<Utc>,
    /// Nonce the quorum signed under
    pub nonce: u64,
    /// Caller that submitted the arm request
    pub initiator: Address,
    /// Heirs whose signatures were accepted
    pub signers: Vec<Address>,
}

impl ArmRequest {
    /// Earliest instant a release is allowed; `None` if the delay overflows
    pub fn unlocks_at(&self, delay_secs: u64) -> Option<DateTime<Utc>> {
        let delay = i64::try_from(delay_secs)
            .ok()
            .and_then(Duration::try_seconds)?;
        self.armed_at.checked_add_signed(delay)
    }
}

/// Record of a completed release
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub destination: Address,
    pub released_at: DateTime<Utc>,
    pub released_by: Address,
    /// Nonce the release was authorized under
    pub nonce: u64,
    pub base_amount: u128,
    pub tokens: Vec<TokenTransfer>,
    pub skipped: Vec<Address>,
}

/// Authoritative arming state
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ArmState {
    #[default]
    Idle,
    Armed(ArmRequest),
    Released(ReleaseRecord),
}

impl ArmState {
    /// The active request, if armed
    pub fn armed(&self) -> Option<&ArmRequest> {
        match self {
            ArmState::Armed(request) => Some(request),
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed().is_some()
    }

    /// The last completed release, if that is the current state
    pub fn last_release(&self) -> Option<&ReleaseRecord> {
        match self {
            ArmState::Released(record) => Some(record),
            _ => None,
        }
    }

    /// Short name for logs and responses
    pub fn name(&self) -> &'static str {
        match self {
            ArmState::Idle => "idle",
            ArmState::Armed(_) => "armed",
            ArmState::Released(_) => "released",
        }
    }

    /// Guard for `arm`: rejected while another request is pending
    pub fn ensure_can_arm(&self) -> Result<(), VaultError> {
        match self.armed() {
            Some(request) => Err(VaultError::AlreadyArmed(request.destination)),
            None => Ok(()),
        }
    }

    /// Guard for `release`: armed and `now >= armed_at + delay`
    pub fn ensure_releasable(
        &self,
        now: DateTime<Utc>,
        delay_secs: u64,
    ) -> Result<&ArmRequest, VaultError> {
        let request = self.armed().ok_or(VaultError::NotArmed)?;
        let unlocks_at = request
            .unlocks_at(delay_secs)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        if now < unlocks_at {
            let remaining_ms = (unlocks_at - now).num_milliseconds().max(0) as u64;
            return Err(VaultError::LockNotElapsed {
                unlocks_at,
                remaining_secs: remaining_ms.div_ceil(1000),
            });
        }
        Ok(request)
    }
}

//! A single custodial succession vault
//!
//! Composes the account registry, the nonce, the verifier and the arming
//! state machine, and drives the asset executor on release. Every method
//! either fully applies or returns an error with no state change.

use crate::assets::{AssetLedger, AssetTransferExecutor, BaseAmount, TransferReport};
use crate::vault::account::{Account, Capability, HeirConfig};
use crate::vault::error::VaultError;
use crate::vault::nonce::NonceLedger;
use crate::vault::state::{ArmRequest, ArmState, ReleaseRecord};
use crate::vault::verifier::{self, VerificationReport};
use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of events kept per vault
const MAX_EVENTS: usize = 100;

/// Something that happened to a vault
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VaultEvent {
    Initialized {
        owner: Address,
        heirs: Vec<Address>,
        threshold: usize,
        delay_secs: u64,
    },
    Armed {
        destination: Address,
        nonce: u64,
        initiator: Address,
        signers: Vec<Address>,
    },
    Cancelled {
        destination: Address,
        new_nonce: u64,
    },
    Released {
        destination: Address,
        released_by: Address,
        base_amount: u128,
        tokens: Vec<Address>,
    },
    ConfigUpdated {
        heirs: Vec<Address>,
        threshold: usize,
        delay_secs: u64,
    },
    EmergencyTransfer {
        to: Address,
        base_amount: u128,
        tokens: Vec<Address>,
    },
}

/// An event with the vault and instant it belongs to
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordedEvent {
    pub vault: Address,
    pub at: DateTime<Utc>,
    pub event: VaultEvent,
}

/// Snapshot returned by `info`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    pub vault: Address,
    pub owner: Address,
    pub heirs: Vec<Address>,
    pub threshold: usize,
    pub delay_secs: u64,
    pub nonce: u64,
    pub state: String,
    pub armed: bool,
    pub armed_destination: Option<Address>,
    pub armed_at: Option<DateTime<Utc>>,
    pub armed_nonce: Option<u64>,
    pub initiator: Option<Address>,
    pub unlocks_at: Option<DateTime<Utc>>,
    pub base_balance: u128,
    pub last_release: Option<ReleaseRecord>,
}

/// Custodial vault guarded by an heir quorum and a release delay
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vault {
    address: Address,
    account: Account,
    nonce: NonceLedger,
    state: ArmState,
    created_at: DateTime<Utc>,
    events: Vec<RecordedEvent>,
}

impl Vault {
    /// One-time setup
    ///
    /// # Errors
    /// `InvalidThreshold`, `DuplicateHeir` or `NullIdentity` for a bad
    /// configuration.
    pub fn initialize(
        address: Address,
        owner: Address,
        heirs: Vec<Address>,
        threshold: usize,
        delay_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, VaultError> {
        let account = Account::new(owner, HeirConfig::new(heirs, threshold, delay_secs)?)?;

        let mut vault = Self {
            address,
            account,
            nonce: NonceLedger::new(),
            state: ArmState::Idle,
            created_at: now,
            events: Vec::new(),
        };
        vault.record(
            now,
            VaultEvent::Initialized {
                owner,
                heirs: vault.account.heirs().to_vec(),
                threshold,
                delay_secs,
            },
        );

        log::info!(
            "Vault {} initialized for {} ({}, {}s delay)",
            address,
            owner,
            vault.account.config().description(),
            delay_secs
        );
        Ok(vault)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn nonce(&self) -> u64 {
        self.nonce.current()
    }

    pub fn state(&self) -> &ArmState {
        &self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Recent events, oldest first
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Owner, heirs, threshold, delay, nonce and arming details
    pub fn info<L: AssetLedger + ?Sized>(&self, ledger: &L) -> AccountInfo {
        let armed = self.state.armed();
        AccountInfo {
            vault: self.address,
            owner: self.account.owner(),
            heirs: self.account.heirs().to_vec(),
            threshold: self.account.threshold(),
            delay_secs: self.account.delay_secs(),
            nonce: self.nonce.current(),
            state: self.state.name().to_string(),
            armed: armed.is_some(),
            armed_destination: armed.map(|r| r.destination),
            armed_at: armed.map(|r| r.armed_at),
            armed_nonce: armed.map(|r| r.nonce),
            initiator: armed.map(|r| r.initiator),
            unlocks_at: armed.and_then(|r| r.unlocks_at(self.account.delay_secs())),
            base_balance: ledger.base_balance(&self.address),
            last_release: self.state.last_release().cloned(),
        }
    }

    /// Hash heirs must sign to authorize a release to `destination`
    pub fn authorization_digest(&self, destination: &Address) -> B256 {
        verifier::authorization_hash(&self.address, self.nonce.current(), destination)
    }

    /// Sift signatures against the current nonce without changing state
    pub fn sift<S: AsRef<[u8]>>(&self, signatures: &[S], destination: &Address) -> VerificationReport {
        self.sift_at(signatures, destination, self.nonce.current())
    }

    fn sift_at<S: AsRef<[u8]>>(
        &self,
        signatures: &[S],
        destination: &Address,
        nonce: u64,
    ) -> VerificationReport {
        verifier::verify(
            signatures,
            &self.address,
            nonce,
            destination,
            self.account.heirs(),
            self.account.threshold(),
        )
    }

    fn check_recipient(&self, recipient: &Address) -> Result<(), VaultError> {
        if *recipient == Address::ZERO || *recipient == self.address {
            return Err(VaultError::InvalidRecipient(*recipient));
        }
        Ok(())
    }

    /// Arm a release to `destination` with a quorum of heir signatures
    ///
    /// `expected_nonce` is the nonce the caller collected signatures under,
    /// when known; a mismatch fails with `ReplayedNonce` before any
    /// signature is examined.
    pub fn arm<S: AsRef<[u8]>>(
        &mut self,
        caller: &Address,
        signatures: &[S],
        destination: &Address,
        expected_nonce: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<ArmRequest, VaultError> {
        self.state.ensure_can_arm()?;
        self.check_recipient(destination)?;

        let current = self.nonce.current();
        if let Some(presented) = expected_nonce.filter(|n| *n != current) {
            return Err(VaultError::ReplayedNonce { presented, current });
        }

        let signers = match self.sift(signatures, destination).into_result() {
            Ok(signers) => signers,
            Err(e) => {
                if let Some(previous) = self.nonce.previous() {
                    if self.sift_at(signatures, destination, previous).is_quorum() {
                        log::warn!(
                            "Vault {}: arm rejected, signatures are for stale nonce {}",
                            self.address,
                            previous
                        );
                        return Err(VaultError::ReplayedNonce {
                            presented: previous,
                            current,
                        });
                    }
                }
                log::warn!("Vault {}: arm rejected: {}", self.address, e);
                return Err(e);
            }
        };

        let request = ArmRequest {
            destination: *destination,
            armed_at: now,
            nonce: current,
            initiator: *caller,
            signers: signers.clone(),
        };
        self.record(
            now,
            VaultEvent::Armed {
                destination: *destination,
                nonce: current,
                initiator: *caller,
                signers,
            },
        );
        self.state = ArmState::Armed(request.clone());

        log::info!(
            "Vault {} armed for {} by {} at nonce {}",
            self.address,
            destination,
            caller,
            current
        );
        Ok(request)
    }

    /// Owner-only: drop the pending request and invalidate its signatures
    ///
    /// Returns the new nonce.
    pub fn cancel(&mut self, caller: &Address, now: DateTime<Utc>) -> Result<u64, VaultError> {
        self.account.require_owner(caller, "cancel a release")?;
        let destination = self
            .state
            .armed()
            .map(|r| r.destination)
            .ok_or(VaultError::NotArmed)?;

        self.state = ArmState::Idle;
        let new_nonce = self.nonce.advance();
        self.record(
            now,
            VaultEvent::Cancelled {
                destination,
                new_nonce,
            },
        );

        log::info!(
            "Vault {} cancelled release to {}, nonce now {}",
            self.address,
            destination,
            new_nonce
        );
        Ok(new_nonce)
    }

    /// Capability `caller` holds for releasing the pending request
    fn release_capability(&self, caller: &Address, request: &ArmRequest) -> Option<Capability> {
        self.account.role_of(caller).or_else(|| {
            if *caller == request.initiator {
                Some(Capability::Initiator)
            } else {
                None
            }
        })
    }

    /// Move everything to the armed destination once the delay has elapsed
    ///
    /// Callable by the owner, any current heir, or the arm initiator. The
    /// full base balance moves, plus the full balance of each listed token;
    /// empty tokens are skipped.
    pub fn release<L: AssetLedger + ?Sized>(
        &mut self,
        caller: &Address,
        tokens: &[Address],
        ledger: &mut L,
        now: DateTime<Utc>,
    ) -> Result<ReleaseRecord, VaultError> {
        let request = self.state.armed().ok_or(VaultError::NotArmed)?;
        let capability = self.release_capability(caller, request).ok_or_else(|| {
            log::warn!("Vault {}: release attempt by {}", self.address, caller);
            VaultError::Unauthorized {
                caller: *caller,
                action: "trigger the release",
            }
        })?;
        let request = self
            .state
            .ensure_releasable(now, self.account.delay_secs())?
            .clone();

        let (report, _) = AssetTransferExecutor::new(ledger, self.address).execute(
            &request.destination,
            BaseAmount::All,
            tokens,
        )?;

        let record = ReleaseRecord {
            destination: request.destination,
            released_at: now,
            released_by: *caller,
            nonce: request.nonce,
            base_amount: report.base_amount,
            tokens: report.tokens.clone(),
            skipped: report.skipped.clone(),
        };
        self.nonce.advance();
        self.record(
            now,
            VaultEvent::Released {
                destination: request.destination,
                released_by: *caller,
                base_amount: report.base_amount,
                tokens: report.token_ids(),
            },
        );
        self.state = ArmState::Released(record.clone());

        log::info!(
            "Vault {} released to {} by {} ({:?})",
            self.address,
            request.destination,
            caller,
            capability
        );
        Ok(record)
    }

    /// Owner-only: replace heirs, threshold and delay together
    pub fn update_config(
        &mut self,
        caller: &Address,
        heirs: Vec<Address>,
        threshold: usize,
        delay_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<HeirConfig, VaultError> {
        self.account
            .require_owner(caller, "update the configuration")?;
        if self.state.is_armed() {
            return Err(VaultError::ConfigLocked);
        }

        let config = self
            .account
            .update_config(caller, heirs, threshold, delay_secs)?
            .clone();
        self.record(
            now,
            VaultEvent::ConfigUpdated {
                heirs: config.heirs.clone(),
                threshold: config.threshold,
                delay_secs: config.delay_secs,
            },
        );

        log::info!(
            "Vault {} configuration updated to {}, {}s delay",
            self.address,
            config.description(),
            config.delay_secs
        );
        Ok(config)
    }

    /// Owner-only escape hatch, independent of the arming state
    ///
    /// Moves the full base balance when `transfer_all_base` is set,
    /// otherwise exactly `base_amount` (`InsufficientETH` if the balance is
    /// lower), plus the full balance of each listed token.
    #[allow(clippy::too_many_arguments)]
    pub fn emergency_transfer<L: AssetLedger + ?Sized>(
        &mut self,
        caller: &Address,
        to: &Address,
        base_amount: u128,
        tokens: &[Address],
        transfer_all_base: bool,
        ledger: &mut L,
        now: DateTime<Utc>,
    ) -> Result<TransferReport, VaultError> {
        self.account
            .require_owner(caller, "transfer assets")?;
        self.check_recipient(to)?;

        let base = if transfer_all_base {
            BaseAmount::All
        } else {
            BaseAmount::Exact(base_amount)
        };
        let (report, _) = AssetTransferExecutor::new(ledger, self.address).execute(to, base, tokens)?;

        self.record(
            now,
            VaultEvent::EmergencyTransfer {
                to: *to,
                base_amount: report.base_amount,
                tokens: report.token_ids(),
            },
        );

        log::info!(
            "Vault {} owner transfer of {} base and {} token(s) to {}",
            self.address,
            report.base_amount,
            report.tokens.len(),
            to
        );
        Ok(report)
    }

    fn record(&mut self, at: DateTime<Utc>, event: VaultEvent) {
        self.events.push(RecordedEvent {
            vault: self.address,
            at,
            event,
        });
        if self.events.len() > MAX_EVENTS {
            self.events.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Asset, InMemoryLedger, LedgerError};
    use crate::crypto::KeyPair;
    use crate::vault::verifier::sign_authorization;
    use chrono::{Duration, TimeZone};

    const DELAY: u64 = 86_400;

    struct Setup {
        vault: Vault,
        ledger: InMemoryLedger,
        owner: Address,
        keys: Vec<KeyPair>,
        destination: Address,
        token: Address,
        t0: DateTime<Utc>,
    }

    fn setup() -> Setup {
        let keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
        let owner = Address::repeat_byte(0xee);
        let address = Address::repeat_byte(0x42);
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let vault = Vault::initialize(
            address,
            owner,
            keys.iter().map(|k| k.address()).collect(),
            2,
            DELAY,
            t0,
        )
        .unwrap();

        let token = Address::repeat_byte(0xaa);
        let mut ledger = InMemoryLedger::new();
        ledger.credit(&Asset::Base, &address, 1_000).unwrap();
        ledger.register_token(token, "TTK".to_string(), 18).unwrap();
        ledger.credit(&Asset::Token(token), &address, 500).unwrap();

        Setup {
            vault,
            ledger,
            owner,
            keys,
            destination: Address::repeat_byte(0xd0),
            token,
            t0,
        }
    }

    impl Setup {
        fn sigs(&self, signers: &[usize]) -> Vec<Vec<u8>> {
            signers
                .iter()
                .map(|i| {
                    sign_authorization(
                        &self.keys[*i],
                        &self.vault.address(),
                        self.vault.nonce(),
                        &self.destination,
                    )
                })
                .collect()
        }

        fn heir(&self, i: usize) -> Address {
            self.keys[i].address()
        }
    }

    #[test]
    fn test_initialize_rejects_bad_threshold() {
        let result = Vault::initialize(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            vec![Address::repeat_byte(3)],
            2,
            0,
            Utc::now(),
        );
        assert!(matches!(result, Err(VaultError::InvalidThreshold { .. })));
    }

    #[test]
    fn test_arm_records_request() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        let caller = Address::repeat_byte(0x77);

        let request = s
            .vault
            .arm(&caller, &sigs, &s.destination, None, s.t0)
            .unwrap();

        assert_eq!(request.destination, s.destination);
        assert_eq!(request.nonce, 0);
        assert_eq!(request.initiator, caller);
        assert_eq!(request.signers, vec![s.heir(0), s.heir(1)]);
        assert!(s.vault.state().is_armed());
        assert_eq!(s.vault.nonce(), 0);
    }

    #[test]
    fn test_failed_arm_changes_nothing() {
        let mut s = setup();
        let sigs = s.sigs(&[0]);
        let events_before = s.vault.events().len();

        let result = s.vault.arm(&s.owner, &sigs, &s.destination, None, s.t0);

        assert!(matches!(
            result,
            Err(VaultError::InsufficientSignatures {
                found: 1,
                needed: 2,
                ..
            })
        ));
        assert_eq!(s.vault.state(), &ArmState::Idle);
        assert_eq!(s.vault.nonce(), 0);
        assert_eq!(s.vault.events().len(), events_before);
    }

    #[test]
    fn test_arm_twice_rejected() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        s.vault
            .arm(&s.owner, &sigs, &s.destination, None, s.t0)
            .unwrap();

        let result = s.vault.arm(&s.owner, &sigs, &s.destination, None, s.t0);
        assert_eq!(result, Err(VaultError::AlreadyArmed(s.destination)));
    }

    #[test]
    fn test_arm_to_zero_destination_rejected() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        let result = s.vault.arm(&s.owner, &sigs, &Address::ZERO, None, s.t0);
        assert_eq!(result, Err(VaultError::InvalidRecipient(Address::ZERO)));
    }

    #[test]
    fn test_expected_nonce_mismatch() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        let result = s.vault.arm(&s.owner, &sigs, &s.destination, Some(3), s.t0);
        assert_eq!(
            result,
            Err(VaultError::ReplayedNonce {
                presented: 3,
                current: 0
            })
        );
    }

    #[test]
    fn test_cancel_advances_nonce_and_invalidates_signatures() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        s.vault
            .arm(&s.owner, &sigs, &s.destination, None, s.t0)
            .unwrap();

        assert_eq!(s.vault.cancel(&s.owner, s.t0).unwrap(), 1);
        assert_eq!(s.vault.state(), &ArmState::Idle);

        let result = s.vault.arm(&s.owner, &sigs, &s.destination, None, s.t0);
        assert_eq!(
            result,
            Err(VaultError::ReplayedNonce {
                presented: 0,
                current: 1
            })
        );
        assert_eq!(s.vault.nonce(), 1);
    }

    #[test]
    fn test_cancel_requires_owner_and_armed() {
        let mut s = setup();
        assert_eq!(s.vault.cancel(&s.owner, s.t0), Err(VaultError::NotArmed));

        let sigs = s.sigs(&[0, 1]);
        s.vault
            .arm(&s.owner, &sigs, &s.destination, None, s.t0)
            .unwrap();
        let heir = s.heir(0);
        assert!(matches!(
            s.vault.cancel(&heir, s.t0),
            Err(VaultError::Unauthorized { .. })
        ));
        assert!(s.vault.state().is_armed());
    }

    #[test]
    fn test_release_after_delay() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        s.vault
            .arm(&s.owner, &sigs, &s.destination, None, s.t0)
            .unwrap();

        let heir = s.heir(1);
        let early = s.t0 + Duration::seconds(DELAY as i64 - 1);
        assert!(matches!(
            s.vault.release(&heir, &[s.token], &mut s.ledger, early),
            Err(VaultError::LockNotElapsed { .. })
        ));
        assert_eq!(s.ledger.base_balance(&s.destination), 0);

        let later = s.t0 + Duration::seconds(DELAY as i64 + 1);
        let record = s
            .vault
            .release(&heir, &[s.token], &mut s.ledger, later)
            .unwrap();

        assert_eq!(record.base_amount, 1_000);
        assert_eq!(record.tokens.len(), 1);
        assert_eq!(s.ledger.base_balance(&s.destination), 1_000);
        assert_eq!(s.ledger.token_balance(&s.token, &s.destination), 500);
        assert_eq!(s.vault.nonce(), 1);
        assert!(s.vault.state().last_release().is_some());
    }

    #[test]
    fn test_failed_release_stays_armed() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        s.vault
            .arm(&s.owner, &sigs, &s.destination, None, s.t0)
            .unwrap();
        s.ledger
            .credit(&Asset::Token(s.token), &s.destination, u128::MAX)
            .unwrap();

        let heir = s.heir(0);
        let later = s.t0 + Duration::seconds(DELAY as i64);
        assert_eq!(
            s.vault.release(&heir, &[s.token], &mut s.ledger, later),
            Err(VaultError::Ledger(LedgerError::Overflow))
        );

        assert_eq!(s.ledger.base_balance(&s.vault.address()), 1_000);
        assert_eq!(s.ledger.base_balance(&s.destination), 0);
        assert_eq!(s.ledger.token_balance(&s.token, &s.vault.address()), 500);
        assert!(s.vault.state().is_armed());
        assert_eq!(s.vault.nonce(), 0);
    }

    #[test]
    fn test_release_capabilities() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        let initiator = Address::repeat_byte(0x77);
        let stranger = Address::repeat_byte(0x78);
        s.vault
            .arm(&initiator, &sigs, &s.destination, None, s.t0)
            .unwrap();
        let later = s.t0 + Duration::seconds(DELAY as i64);

        assert!(matches!(
            s.vault.release(&stranger, &[], &mut s.ledger, later),
            Err(VaultError::Unauthorized { .. })
        ));
        assert!(s.vault.release(&initiator, &[], &mut s.ledger, later).is_ok());
    }

    #[test]
    fn test_release_when_idle() {
        let mut s = setup();
        let owner = s.owner;
        assert_eq!(
            s.vault.release(&owner, &[], &mut s.ledger, s.t0),
            Err(VaultError::NotArmed)
        );
    }

    #[test]
    fn test_rearm_after_release_needs_fresh_signatures() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        s.vault
            .arm(&s.owner, &sigs, &s.destination, None, s.t0)
            .unwrap();
        let later = s.t0 + Duration::seconds(DELAY as i64);
        let owner = s.owner;
        s.vault.release(&owner, &[], &mut s.ledger, later).unwrap();

        assert!(matches!(
            s.vault.arm(&s.owner, &sigs, &s.destination, None, later),
            Err(VaultError::ReplayedNonce { .. })
        ));

        let fresh = s.sigs(&[1, 2]);
        let request = s
            .vault
            .arm(&s.owner, &fresh, &s.destination, None, later)
            .unwrap();
        assert_eq!(request.nonce, 1);
    }

    #[test]
    fn test_update_config_locked_while_armed() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 1]);
        s.vault
            .arm(&s.owner, &sigs, &s.destination, None, s.t0)
            .unwrap();

        let heirs = vec![s.heir(0)];
        assert_eq!(
            s.vault.update_config(&s.owner, heirs, 1, 0, s.t0),
            Err(VaultError::ConfigLocked)
        );
    }

    #[test]
    fn test_update_config_keeps_nonce() {
        let mut s = setup();
        let heirs = vec![s.heir(0), s.heir(2)];
        let config = s
            .vault
            .update_config(&s.owner, heirs, 1, 60, s.t0)
            .unwrap();

        assert_eq!(config.description(), "1-of-2");
        assert_eq!(s.vault.nonce(), 0);
        assert_eq!(s.vault.account().delay_secs(), 60);
    }

    #[test]
    fn test_emergency_transfer() {
        let mut s = setup();
        let owner = s.owner;
        let to = Address::repeat_byte(0x99);

        let result = s.vault.emergency_transfer(
            &owner, &to, 5_000, &[], false, &mut s.ledger, s.t0,
        );
        assert_eq!(
            result,
            Err(VaultError::InsufficientEth {
                have: 1_000,
                need: 5_000
            })
        );

        let report = s
            .vault
            .emergency_transfer(&owner, &to, 300, &[s.token], false, &mut s.ledger, s.t0)
            .unwrap();
        assert_eq!(report.base_amount, 300);
        assert_eq!(s.ledger.base_balance(&to), 300);
        assert_eq!(s.ledger.token_balance(&s.token, &to), 500);

        let report = s
            .vault
            .emergency_transfer(&owner, &to, 0, &[s.token], true, &mut s.ledger, s.t0)
            .unwrap();
        assert_eq!(report.base_amount, 700);
        assert_eq!(report.skipped, vec![s.token]);
    }

    #[test]
    fn test_emergency_transfer_guards() {
        let mut s = setup();
        let owner = s.owner;
        let heir = s.heir(0);

        assert!(matches!(
            s.vault
                .emergency_transfer(&heir, &heir, 1, &[], false, &mut s.ledger, s.t0),
            Err(VaultError::Unauthorized { .. })
        ));
        assert_eq!(
            s.vault
                .emergency_transfer(&owner, &Address::ZERO, 1, &[], false, &mut s.ledger, s.t0),
            Err(VaultError::InvalidRecipient(Address::ZERO))
        );
    }

    #[test]
    fn test_info_reports_armed_request() {
        let mut s = setup();
        let sigs = s.sigs(&[0, 2]);
        s.vault
            .arm(&s.owner, &sigs, &s.destination, None, s.t0)
            .unwrap();

        let info = s.vault.info(&s.ledger);
        assert!(info.armed);
        assert_eq!(info.state, "armed");
        assert_eq!(info.armed_destination, Some(s.destination));
        assert_eq!(info.armed_at, Some(s.t0));
        assert_eq!(info.unlocks_at, Some(s.t0 + Duration::seconds(DELAY as i64)));
        assert_eq!(info.base_balance, 1_000);
        assert_eq!(info.heirs.len(), 3);
    }
}

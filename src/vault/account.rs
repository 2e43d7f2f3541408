//! Account registry: owner, heirs, threshold and release delay
//!
//! Only the owner may change the configuration, and an invalid
//! configuration is rejected before anything is stored.

use crate::vault::error::VaultError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// What a caller is allowed to do on a vault
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// The account owner
    Owner,
    /// A current heir
    Heir,
    /// Whoever submitted the active arm request
    Initiator,
}

/// Heir set, threshold and delay, validated together
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "UncheckedHeirConfig")]
pub struct HeirConfig {
    /// Identities allowed to co-sign a release (order is irrelevant)
    pub heirs: Vec<Address>,
    /// Minimum distinct heir signatures required to arm (M in M-of-N)
    pub threshold: usize,
    /// Seconds between arming and the earliest release
    pub delay_secs: u64,
}

impl HeirConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    /// `InvalidThreshold` unless `1 <= threshold <= heirs.len()`;
    /// `DuplicateHeir` if an identity appears twice; `NullIdentity` for the
    /// zero address.
    pub fn new(heirs: Vec<Address>, threshold: usize, delay_secs: u64) -> Result<Self, VaultError> {
        if threshold == 0 || threshold > heirs.len() {
            return Err(VaultError::InvalidThreshold {
                threshold,
                heirs: heirs.len(),
            });
        }

        let mut sorted = heirs.clone();
        sorted.sort();
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(VaultError::DuplicateHeir(pair[0]));
        }
        if heirs.contains(&Address::ZERO) {
            return Err(VaultError::NullIdentity("an heir"));
        }

        Ok(Self {
            heirs,
            threshold,
            delay_secs,
        })
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.heirs.len())
    }
}

/// Wire form of [`HeirConfig`] before validation
#[derive(Deserialize)]
struct UncheckedHeirConfig {
    heirs: Vec<Address>,
    threshold: usize,
    delay_secs: u64,
}

impl TryFrom<UncheckedHeirConfig> for HeirConfig {
    type Error = VaultError;

    fn try_from(raw: UncheckedHeirConfig) -> Result<Self, Self::Error> {
        HeirConfig::new(raw.heirs, raw.threshold, raw.delay_secs)
    }
}

/// The custodial account's authority configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "UncheckedAccount")]
pub struct Account {
    owner: Address,
    config: HeirConfig,
}

#[derive(Deserialize)]
struct UncheckedAccount {
    owner: Address,
    config: HeirConfig,
}

impl TryFrom<UncheckedAccount> for Account {
    type Error = VaultError;

    fn try_from(raw: UncheckedAccount) -> Result<Self, Self::Error> {
        Account::new(raw.owner, raw.config)
    }
}

impl Account {
    /// Create an account; the owner is fixed for its lifetime
    pub fn new(owner: Address, config: HeirConfig) -> Result<Self, VaultError> {
        if owner == Address::ZERO {
            return Err(VaultError::NullIdentity("the owner"));
        }
        Ok(Self { owner, config })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn heirs(&self) -> &[Address] {
        &self.config.heirs
    }

    pub fn threshold(&self) -> usize {
        self.config.threshold
    }

    pub fn delay_secs(&self) -> u64 {
        self.config.delay_secs
    }

    pub fn config(&self) -> &HeirConfig {
        &self.config
    }

    /// Check if an identity is a current heir
    pub fn is_heir(&self, identity: &Address) -> bool {
        self.config.heirs.contains(identity)
    }

    /// Capabilities held by `caller` through the registry alone
    pub fn role_of(&self, caller: &Address) -> Option<Capability> {
        if *caller == self.owner {
            Some(Capability::Owner)
        } else if self.is_heir(caller) {
            Some(Capability::Heir)
        } else {
            None
        }
    }

    /// Fail with `Unauthorized` unless `caller` is the owner
    pub fn require_owner(&self, caller: &Address, action: &'static str) -> Result<(), VaultError> {
        if *caller != self.owner {
            log::warn!("Rejected {} by non-owner {}", action, caller);
            return Err(VaultError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        Ok(())
    }

    /// Atomically replace heirs, threshold and delay
    pub fn update_config(
        &mut self,
        caller: &Address,
        heirs: Vec<Address>,
        threshold: usize,
        delay_secs: u64,
    ) -> Result<&HeirConfig, VaultError> {
        self.require_owner(caller, "update the configuration")?;
        self.config = HeirConfig::new(heirs, threshold, delay_secs)?;
        Ok(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn sample_account() -> Account {
        let config = HeirConfig::new(vec![addr(1), addr(2), addr(3)], 2, 86_400).unwrap();
        Account::new(addr(0xee), config).unwrap()
    }

    #[test]
    fn test_config_validation() {
        // Zero threshold
        assert!(matches!(
            HeirConfig::new(vec![addr(1)], 0, 0),
            Err(VaultError::InvalidThreshold { .. })
        ));

        // Threshold > heirs
        assert_eq!(
            HeirConfig::new(vec![addr(1), addr(2), addr(3)], 4, 0),
            Err(VaultError::InvalidThreshold {
                threshold: 4,
                heirs: 3
            })
        );

        // Empty heir set
        assert!(HeirConfig::new(vec![], 1, 0).is_err());

        // Duplicate heirs
        assert_eq!(
            HeirConfig::new(vec![addr(1), addr(2), addr(1)], 2, 0),
            Err(VaultError::DuplicateHeir(addr(1)))
        );

        // Zero address heir
        assert!(HeirConfig::new(vec![Address::ZERO], 1, 0).is_err());

        // Single heir is fine
        assert_eq!(HeirConfig::new(vec![addr(1)], 1, 0).unwrap().description(), "1-of-1");
    }

    #[test]
    fn test_roles() {
        let account = sample_account();
        assert_eq!(account.role_of(&addr(0xee)), Some(Capability::Owner));
        assert_eq!(account.role_of(&addr(2)), Some(Capability::Heir));
        assert_eq!(account.role_of(&addr(9)), None);
    }

    #[test]
    fn test_update_config_by_owner() {
        let mut account = sample_account();
        account
            .update_config(&addr(0xee), vec![addr(1), addr(4)], 1, 60)
            .unwrap();

        assert_eq!(account.heirs(), &[addr(1), addr(4)]);
        assert_eq!(account.threshold(), 1);
        assert_eq!(account.delay_secs(), 60);
        assert!(!account.is_heir(&addr(2)));
    }

    #[test]
    fn test_deserialize_validates_config() {
        let valid = serde_json::json!({ "heirs": [addr(1), addr(2)], "threshold": 2, "delay_secs": 60 });
        let config: HeirConfig = serde_json::from_value(valid).unwrap();
        assert_eq!(config.description(), "2-of-2");

        let zero = serde_json::json!({ "heirs": [addr(1)], "threshold": 0, "delay_secs": 60 });
        assert!(serde_json::from_value::<HeirConfig>(zero).is_err());

        let twice = serde_json::json!({ "heirs": [addr(1), addr(1)], "threshold": 1, "delay_secs": 60 });
        assert!(serde_json::from_value::<HeirConfig>(twice).is_err());

        let no_owner = serde_json::json!({
            "owner": Address::ZERO,
            "config": { "heirs": [addr(1)], "threshold": 1, "delay_secs": 60 }
        });
        assert!(serde_json::from_value::<Account>(no_owner).is_err());
    }

    #[test]
    fn test_update_config_rejections_leave_state() {
        let mut account = sample_account();
        let before = account.clone();

        let result = account.update_config(&addr(1), vec![addr(1)], 1, 0);
        assert!(matches!(result, Err(VaultError::Unauthorized { .. })));

        let result = account.update_config(&addr(0xee), vec![addr(1), addr(2)], 3, 0);
        assert!(matches!(result, Err(VaultError::InvalidThreshold { .. })));

        assert_eq!(account, before);
    }
}

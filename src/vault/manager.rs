//! Vault manager
//!
//! Owns every deployed vault together with the ledger that custodies their
//! assets, and routes operations by vault address.

use crate::assets::{discover, Asset, AssetLedger, InMemoryLedger, TokenBalanceEntry, TransferReport};
use crate::crypto::keccak;
use crate::vault::account::HeirConfig;
use crate::vault::error::VaultError;
use crate::vault::state::{ArmRequest, ReleaseRecord};
use crate::vault::vault::{AccountInfo, RecordedEvent, Vault};
use crate::vault::verifier::VerificationReport;
use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Registry of vaults sharing one asset ledger
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VaultManager<L = InMemoryLedger> {
    /// Vaults by address
    vaults: HashMap<Address, Vault>,
    /// Number of vaults ever created, mixed into new addresses
    deployments: u64,
    ledger: L,
}

/// Address for the `counter`-th vault created by `owner`
pub fn derive_vault_address(owner: &Address, counter: u64) -> Address {
    let mut preimage = [0u8; 28];
    preimage[..20].copy_from_slice(owner.as_slice());
    preimage[20..].copy_from_slice(&counter.to_be_bytes());
    Address::from_slice(&keccak(&preimage)[12..])
}

impl<L: AssetLedger> VaultManager<L> {
    /// Create an empty manager over `ledger`
    pub fn new(ledger: L) -> Self {
        Self {
            vaults: HashMap::new(),
            deployments: 0,
            ledger,
        }
    }

    /// Deploy a new vault for `owner`
    pub fn create_vault(
        &mut self,
        owner: Address,
        heirs: Vec<Address>,
        threshold: usize,
        delay_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<&Vault, VaultError> {
        let mut counter = self.deployments;
        let mut address = derive_vault_address(&owner, counter);
        while self.vaults.contains_key(&address) {
            counter += 1;
            address = derive_vault_address(&owner, counter);
        }

        let vault = Vault::initialize(address, owner, heirs, threshold, delay_secs, now)?;
        self.deployments = counter + 1;
        Ok(self.vaults.entry(address).or_insert(vault))
    }

    /// Get a vault by address
    pub fn get_vault(&self, address: &Address) -> Option<&Vault> {
        self.vaults.get(address)
    }

    /// List all vaults
    pub fn list_vaults(&self) -> Vec<&Vault> {
        let mut vaults: Vec<&Vault> = self.vaults.values().collect();
        vaults.sort_by_key(|v| (v.created_at(), v.address()));
        vaults
    }

    /// Vaults where `identity` is the owner or an heir
    pub fn vaults_for(&self, identity: &Address) -> Vec<&Vault> {
        self.list_vaults()
            .into_iter()
            .filter(|v| v.account().role_of(identity).is_some())
            .collect()
    }

    /// Get vault count
    pub fn vault_count(&self) -> usize {
        self.vaults.len()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    fn vault(&self, address: &Address) -> Result<&Vault, VaultError> {
        self.vaults
            .get(address)
            .ok_or(VaultError::VaultNotFound(*address))
    }

    fn vault_mut(&mut self, address: &Address) -> Result<&mut Vault, VaultError> {
        self.vaults
            .get_mut(address)
            .ok_or(VaultError::VaultNotFound(*address))
    }

    pub fn info(&self, vault: &Address) -> Result<AccountInfo, VaultError> {
        Ok(self.vault(vault)?.info(&self.ledger))
    }

    /// Recent events of one vault, oldest first
    pub fn events(&self, vault: &Address) -> Result<&[RecordedEvent], VaultError> {
        Ok(self.vault(vault)?.events())
    }

    /// The current nonce and the hash heirs must sign for `destination`
    pub fn authorization_digest(
        &self,
        vault: &Address,
        destination: &Address,
    ) -> Result<(u64, B256), VaultError> {
        let vault = self.vault(vault)?;
        Ok((vault.nonce(), vault.authorization_digest(destination)))
    }

    pub fn sift<S: AsRef<[u8]>>(
        &self,
        vault: &Address,
        signatures: &[S],
        destination: &Address,
    ) -> Result<VerificationReport, VaultError> {
        Ok(self.vault(vault)?.sift(signatures, destination))
    }

    pub fn arm<S: AsRef<[u8]>>(
        &mut self,
        vault: &Address,
        caller: &Address,
        signatures: &[S],
        destination: &Address,
        expected_nonce: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<ArmRequest, VaultError> {
        self.vault_mut(vault)?
            .arm(caller, signatures, destination, expected_nonce, now)
    }

    pub fn cancel(
        &mut self,
        vault: &Address,
        caller: &Address,
        now: DateTime<Utc>,
    ) -> Result<u64, VaultError> {
        self.vault_mut(vault)?.cancel(caller, now)
    }

    pub fn release(
        &mut self,
        vault: &Address,
        caller: &Address,
        tokens: &[Address],
        now: DateTime<Utc>,
    ) -> Result<ReleaseRecord, VaultError> {
        let entry = self
            .vaults
            .get_mut(vault)
            .ok_or(VaultError::VaultNotFound(*vault))?;
        entry.release(caller, tokens, &mut self.ledger, now)
    }

    pub fn update_config(
        &mut self,
        vault: &Address,
        caller: &Address,
        heirs: Vec<Address>,
        threshold: usize,
        delay_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<HeirConfig, VaultError> {
        self.vault_mut(vault)?
            .update_config(caller, heirs, threshold, delay_secs, now)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn emergency_transfer(
        &mut self,
        vault: &Address,
        caller: &Address,
        to: &Address,
        base_amount: u128,
        tokens: &[Address],
        transfer_all_base: bool,
        now: DateTime<Utc>,
    ) -> Result<TransferReport, VaultError> {
        let entry = self
            .vaults
            .get_mut(vault)
            .ok_or(VaultError::VaultNotFound(*vault))?;
        entry.emergency_transfer(
            caller,
            to,
            base_amount,
            tokens,
            transfer_all_base,
            &mut self.ledger,
            now,
        )
    }

    /// Non-zero token balances of a vault among `candidates`
    pub fn discover_tokens(
        &self,
        vault: &Address,
        candidates: &[Address],
    ) -> Result<Vec<TokenBalanceEntry>, VaultError> {
        let vault = self.vault(vault)?;
        Ok(discover(&self.ledger, &vault.address(), candidates))
    }
}

impl VaultManager<InMemoryLedger> {
    /// Fund a vault with `amount` of `asset`; returns the new balance
    pub fn deposit(&mut self, vault: &Address, asset: &Asset, amount: u128) -> Result<u128, VaultError> {
        self.vault(vault)?;
        let balance = self.ledger.credit(asset, vault, amount)?;
        log::info!("Deposited {} of {:?} into vault {}", amount, asset, vault);
        Ok(balance)
    }
}

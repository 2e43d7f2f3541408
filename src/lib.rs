//! Heir Vault: a custodial succession vault
//!
//! An owner deposits a base currency and tokens, names a set of heirs and a
//! signature threshold. When a quorum of heirs signs an authorization for a
//! destination, the vault is armed; once the release delay has elapsed the
//! full balances move to that destination. The owner can cancel at any time
//! before release, which advances the nonce and voids outstanding
//! signatures.
//!
//! This crate provides:
//! - Ethereum-compatible identities and personal-message signatures (secp256k1)
//! - Quorum verification that sifts duplicates, strangers and malformed input
//! - An arm / cancel / release state machine with a mandatory delay
//! - An asset ledger abstraction, an in-memory ledger and token discovery
//! - JSON snapshot persistence, a REST API and a WebSocket event stream
//!
//! # Example
//!
//! ```rust
//! use heir_vault::assets::Asset;
//! use heir_vault::crypto::KeyPair;
//! use heir_vault::vault::{sign_authorization, VaultManager};
//! use alloy_primitives::Address;
//! use chrono::{Duration, Utc};
//!
//! let heirs: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
//! let owner = Address::repeat_byte(0xee);
//! let destination = Address::repeat_byte(0xd0);
//! let now = Utc::now();
//!
//! let mut manager: VaultManager = VaultManager::default();
//! let vault = manager
//!     .create_vault(owner, heirs.iter().map(|k| k.address()).collect(), 2, 86_400, now)
//!     .unwrap()
//!     .address();
//! manager.deposit(&vault, &Asset::Base, 1_000).unwrap();
//!
//! // Two heirs sign off-protocol and anyone submits
//! let sigs: Vec<Vec<u8>> = heirs[..2]
//!     .iter()
//!     .map(|k| sign_authorization(k, &vault, 0, &destination))
//!     .collect();
//! manager.arm(&vault, &heirs[0].address(), &sigs, &destination, Some(0), now).unwrap();
//!
//! // After the delay an heir triggers the release
//! let later = now + Duration::seconds(86_400);
//! let record = manager.release(&vault, &heirs[1].address(), &[], later).unwrap();
//! assert_eq!(record.base_amount, 1_000);
//! ```

pub mod api;
pub mod assets;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod storage;
pub mod vault;

// Re-export commonly used types
pub use api::{create_router, ApiState};
pub use assets::{AssetLedger, InMemoryLedger};
pub use config::ServiceConfig;
pub use crypto::KeyPair;
pub use storage::{Storage, StorageConfig};
pub use vault::{Vault, VaultError, VaultManager};

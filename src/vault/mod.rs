//! Succession vault
//!
//! An owner deposits assets into a vault and names a set of heirs. When
//! enough heirs co-sign an authorization for a destination, the vault is
//! armed; after the configured delay the whole balance may be released to
//! that destination. The owner can cancel at any time before release, which
//! advances the nonce and voids every collected signature.
//!
//! # Example
//!
//! ```ignore
//! use heir_vault::vault::{VaultManager, sign_authorization};
//!
//! let mut manager: VaultManager = VaultManager::default();
//! let vault = manager.create_vault(owner, heirs, 2, 86_400, now)?.address();
//! let (nonce, _) = manager.authorization_digest(&vault, &destination)?;
//! let sigs: Vec<_> = keys.iter().map(|k| sign_authorization(k, &vault, nonce, &destination)).collect();
//! manager.arm(&vault, &caller, &sigs, &destination, Some(nonce), now)?;
//! ```

pub mod account;
pub mod clock;
pub mod error;
pub mod manager;
pub mod nonce;
pub mod state;
pub mod vault;
pub mod verifier;

pub use account::{Account, Capability, HeirConfig};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::VaultError;
pub use manager::{derive_vault_address, VaultManager};
pub use nonce::NonceLedger;
pub use state::{ArmRequest, ArmState, ReleaseRecord};
pub use vault::{AccountInfo, RecordedEvent, Vault, VaultEvent};
pub use verifier::{
    authorization_hash, authorization_message, sign_authorization, signing_digest, verify,
    RejectReason, Rejection, SignatureVerifier, VerificationReport,
};

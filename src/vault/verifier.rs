//! Quorum signature verification
//!
//! The canonical authorization message is the packed encoding of
//! `(vault, nonce, destination)`:
//!
//! ```text
//! vault (20 bytes) || nonce as uint256 big-endian (32 bytes) || destination (20 bytes)
//! ```
//!
//! Its Keccak-256 hash is signed with the personal-message convention. Any
//! change to this layout breaks compatibility with signatures produced by
//! standard wallets.
//!
//! Verification sifts a batch: signatures that fail recovery, recover to a
//! non-heir, or repeat an already accepted heir are dropped individually and
//! recorded in the [`VerificationReport`]; only the count of distinct
//! accepted heirs decides the outcome.

use crate::crypto::{keccak, personal_digest, recover_signer, KeyPair};
use crate::vault::error::VaultError;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Length of the packed authorization message
pub const MESSAGE_LENGTH: usize = 72;

/// Packed `(vault, nonce, destination)` message
pub fn authorization_message(vault: &Address, nonce: u64, destination: &Address) -> [u8; MESSAGE_LENGTH] {
    let mut message = [0u8; MESSAGE_LENGTH];
    message[..20].copy_from_slice(vault.as_slice());
    message[20..52].copy_from_slice(&U256::from(nonce).to_be_bytes::<32>());
    message[52..].copy_from_slice(destination.as_slice());
    message
}

/// Keccak-256 of the packed message; this is what heirs sign
pub fn authorization_hash(vault: &Address, nonce: u64, destination: &Address) -> B256 {
    keccak(&authorization_message(vault, nonce, destination))
}

/// Digest a signature must recover against
pub fn signing_digest(vault: &Address, nonce: u64, destination: &Address) -> B256 {
    personal_digest(authorization_hash(vault, nonce, destination).as_slice())
}

/// Produce an heir's authorization signature (signer collaborator)
pub fn sign_authorization(
    key: &KeyPair,
    vault: &Address,
    nonce: u64,
    destination: &Address,
) -> Vec<u8> {
    key.sign_personal(authorization_hash(vault, nonce, destination).as_slice())
        .to_vec()
}

/// Why one candidate signature was not counted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
    /// Malformed bytes or signer recovery failed
    Unrecoverable(String),
    /// Recovered identity is not a current heir
    NotHeir(Address),
    /// Heir already accepted earlier in the batch
    Duplicate(Address),
}

/// A discarded candidate and its position in the submitted batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub index: usize,
    pub reason: RejectReason,
}

/// Result of sifting a batch of signatures
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Distinct accepted heirs, first occurrence order
    pub accepted: Vec<Address>,
    /// Batch positions of the accepted signatures
    pub accepted_indices: Vec<usize>,
    /// Every discarded candidate
    pub rejected: Vec<Rejection>,
    /// Signatures required
    pub threshold: usize,
}

impl VerificationReport {
    /// Whether enough distinct heirs signed
    pub fn is_quorum(&self) -> bool {
        self.accepted.len() >= self.threshold
    }

    /// Number of candidates submitted
    pub fn submitted(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    /// Heirs whose signature appeared more than once
    pub fn duplicates(&self) -> Vec<Address> {
        self.rejected
            .iter()
            .filter_map(|r| match r.reason {
                RejectReason::Duplicate(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    /// Recovered identities outside the heir set
    pub fn foreign(&self) -> Vec<Address> {
        self.rejected
            .iter()
            .filter_map(|r| match r.reason {
                RejectReason::NotHeir(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    /// Candidates that could not be recovered at all
    pub fn malformed_count(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| matches!(r.reason, RejectReason::Unrecoverable(_)))
            .count()
    }

    /// Accepted heirs on quorum, otherwise the matching failure
    pub fn into_result(self) -> Result<Vec<Address>, VaultError> {
        if self.is_quorum() {
            return Ok(self.accepted);
        }
        if self.accepted.is_empty() && !self.rejected.is_empty() {
            return Err(VaultError::InvalidSignature {
                submitted: self.submitted(),
                report: self,
            });
        }
        Err(VaultError::InsufficientSignatures {
            found: self.accepted.len(),
            needed: self.threshold,
            report: self,
        })
    }
}

/// Verifies batches against a heir set and threshold
pub struct SignatureVerifier<'a> {
    heirs: &'a [Address],
    threshold: usize,
}

impl<'a> SignatureVerifier<'a> {
    pub fn new(heirs: &'a [Address], threshold: usize) -> Self {
        Self { heirs, threshold }
    }

    /// Sift `candidates` against `digest`
    pub fn sift<S: AsRef<[u8]>>(&self, digest: &B256, candidates: &[S]) -> VerificationReport {
        let initial = VerificationReport {
            threshold: self.threshold,
            ..Default::default()
        };

        candidates
            .iter()
            .map(|candidate| recover_signer(digest, candidate.as_ref()))
            .enumerate()
            .fold(initial, |mut report, (index, recovered)| {
                let verdict = match recovered {
                    Err(e) => Err(RejectReason::Unrecoverable(e.to_string())),
                    Ok(signer) if !self.heirs.contains(&signer) => {
                        Err(RejectReason::NotHeir(signer))
                    }
                    Ok(signer) if report.accepted.contains(&signer) => {
                        Err(RejectReason::Duplicate(signer))
                    }
                    Ok(signer) => Ok(signer),
                };
                match verdict {
                    Ok(signer) => {
                        report.accepted.push(signer);
                        report.accepted_indices.push(index);
                    }
                    Err(reason) => {
                        log::debug!("Discarding signature #{}: {:?}", index, reason);
                        report.rejected.push(Rejection { index, reason });
                    }
                }
                report
            })
    }
}

/// Verify `candidates` for `(vault, nonce, destination)` against `heirs`
pub fn verify<S: AsRef<[u8]>>(
    candidates: &[S],
    vault: &Address,
    nonce: u64,
    destination: &Address,
    heirs: &[Address],
    threshold: usize,
) -> VerificationReport {
    let digest = signing_digest(vault, nonce, destination);
    SignatureVerifier::new(heirs, threshold).sift(&digest, candidates)
}

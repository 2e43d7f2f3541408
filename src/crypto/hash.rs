//! Hashing utilities for the vault protocol
//!
//! Provides the Keccak-256 based hashes used for the canonical authorization
//! message and the personal-message signing convention.

use alloy_primitives::{eip191_hash_message, keccak256, B256};

/// Computes Keccak-256 of the input data
pub fn keccak(data: &[u8]) -> B256 {
    keccak256(data)
}

/// Computes Keccak-256 and returns it as a `0x`-prefixed hex string
pub fn keccak_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(data)))
}

/// Digest actually signed by a wallet for `message`
///
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`
pub fn personal_digest(message: &[u8]) -> B256 {
    eip191_hash_message(message)
}

//! Cryptographic utilities for the vault protocol
//!
//! This module provides:
//! - Keccak-256 hashing and the personal-message digest
//! - secp256k1 signing and signer recovery

pub mod hash;
pub mod keys;

pub use hash::{keccak, keccak_hex, personal_digest};
pub use keys::{
    decode_hex, public_key_to_address, recover_signer, sign_digest, KeyError, KeyPair,
    SIGNATURE_LENGTH,
};

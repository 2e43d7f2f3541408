//! ECDSA key management and signer recovery
//!
//! Signatures follow the wallet personal-message convention on secp256k1:
//! 65 bytes `r || s || v` with `v` in `{27, 28}` (or the raw `{0, 1}`),
//! and identities are 20-byte addresses derived from the uncompressed
//! public key.

use alloy_primitives::{Address, B256};
use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::hash::personal_digest;

/// Length of a serialized recoverable signature
pub const SIGNATURE_LENGTH: usize = 65;

/// Errors that can occur during key operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),
    #[error("Non-canonical signature: s value is in the upper half of the curve order")]
    MalleableSignature,
    #[error("Signer recovery failed: {0}")]
    RecoveryFailed(String),
}

impl From<secp256k1::Error> for KeyError {
    fn from(e: secp256k1::Error) -> Self {
        KeyError::RecoveryFailed(e.to_string())
    }
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key (`0x` prefix optional)
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = decode_hex(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// The identity controlled by this key
    pub fn address(&self) -> Address {
        public_key_to_address(&self.public_key)
    }

    /// Sign an arbitrary message under the personal-message convention
    pub fn sign_personal(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        sign_digest(&self.secret_key, &personal_digest(message))
    }
}

/// Convert a public key to its 20-byte address
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    Address::from_raw_public_key(&uncompressed[1..])
}

/// Sign a 32-byte digest, producing `r || s || v` with `v` in `{27, 28}`
pub fn sign_digest(secret_key: &SecretKey, digest: &B256) -> [u8; SIGNATURE_LENGTH] {
    let secp = Secp256k1::new();
    let message = Message::from_digest(digest.0);
    let signature = secp.sign_ecdsa_recoverable(&message, secret_key);
    let (recovery_id, compact) = signature.serialize_compact();

    let mut out = [0u8; SIGNATURE_LENGTH];
    out[..64].copy_from_slice(&compact);
    out[64] = 27 + recovery_id.to_i32() as u8;
    out
}

/// Recover the identity that produced `signature` over `digest`
///
/// Pure function: any malformed, malleable or unrecoverable input is an
/// error and nothing else is affected.
pub fn recover_signer(digest: &B256, signature: &[u8]) -> Result<Address, KeyError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(KeyError::InvalidSignatureLength(signature.len()));
    }

    let v = signature[64];
    let recovery_byte = match v {
        27 | 28 => v - 27,
        0 | 1 => v,
        other => return Err(KeyError::InvalidRecoveryId(other)),
    };
    let recovery_id = RecoveryId::from_i32(i32::from(recovery_byte))?;
    let recoverable = RecoverableSignature::from_compact(&signature[..64], recovery_id)?;

    let standard = recoverable.to_standard();
    let mut normalized = standard;
    normalized.normalize_s();
    if normalized != standard {
        return Err(KeyError::MalleableSignature);
    }

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(digest.0);
    let public_key = secp.recover_ecdsa(&message, &recoverable)?;
    Ok(public_key_to_address(&public_key))
}

/// Decode hex with an optional `0x` prefix
pub fn decode_hex(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = input.trim();
    hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keccak;

    #[test]
    fn test_key_pair_from_hex() {
        let key = KeyPair::from_private_key_hex(
            "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
        )
        .unwrap();
        assert_eq!(
            key.address(),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_sign_and_recover() {
        let kp = KeyPair::generate();
        let digest = keccak(b"Hello, heirs!");

        let signature = sign_digest(&kp.secret_key, &digest);
        assert!(signature[64] == 27 || signature[64] == 28);
        assert_eq!(recover_signer(&digest, &signature).unwrap(), kp.address());
    }

    #[test]
    fn test_raw_recovery_byte_accepted() {
        let kp = KeyPair::generate();
        let digest = keccak(b"raw v");

        let mut signature = sign_digest(&kp.secret_key, &digest);
        signature[64] -= 27;
        assert_eq!(recover_signer(&digest, &signature).unwrap(), kp.address());
    }

    #[test]
    fn test_wrong_digest_recovers_other_identity() {
        let kp = KeyPair::generate();
        let signature = sign_digest(&kp.secret_key, &keccak(b"one"));

        let recovered = recover_signer(&keccak(b"two"), &signature);
        assert!(recovered.map(|a| a != kp.address()).unwrap_or(true));
    }

    #[test]
    fn test_malformed_signatures_rejected() {
        let digest = keccak(b"x");
        assert_eq!(
            recover_signer(&digest, &[0u8; 10]),
            Err(KeyError::InvalidSignatureLength(10))
        );

        let mut bad_v = [1u8; SIGNATURE_LENGTH];
        bad_v[64] = 5;
        assert_eq!(
            recover_signer(&digest, &bad_v),
            Err(KeyError::InvalidRecoveryId(5))
        );
    }

    #[test]
    fn test_high_s_rejected() {
        // secp256k1 group order n
        const N: [u8; 32] = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c,
            0xd0, 0x36, 0x41, 0x41,
        ];

        let kp = KeyPair::generate();
        let digest = keccak(b"malleable");
        let mut signature = sign_digest(&kp.secret_key, &digest);

        // s' = n - s, flip v
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let diff = N[i] as i16 - signature[32 + i] as i16 - borrow;
            if diff < 0 {
                signature[32 + i] = (diff + 256) as u8;
                borrow = 1;
            } else {
                signature[32 + i] = diff as u8;
                borrow = 0;
            }
        }
        signature[64] = if signature[64] == 27 { 28 } else { 27 };

        assert_eq!(
            recover_signer(&digest, &signature),
            Err(KeyError::MalleableSignature)
        );
    }
}

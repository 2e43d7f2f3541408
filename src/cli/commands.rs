//! CLI commands for the vault
//!
//! Offline helpers for heirs (digest, sign) and a read-only view of the
//! service snapshot.

use crate::crypto::{personal_digest, KeyPair};
use crate::storage::{Storage, StorageConfig};
use crate::vault::verifier::{authorization_hash, authorization_message, sign_authorization};
use crate::vault::AccountInfo;
use alloy_primitives::Address;
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Print the authorization message, its hash and the signed digest
pub fn cmd_digest(vault: &Address, nonce: u64, destination: &Address) -> CliResult<()> {
    let message = authorization_message(vault, nonce, destination);
    let hash = authorization_hash(vault, nonce, destination);

    println!("🧾 Authorization for vault {}", vault);
    println!("   ├─ Nonce: {}", nonce);
    println!("   ├─ Destination: {}", destination);
    println!("   ├─ Message: 0x{}", hex::encode(message));
    println!("   ├─ Hash (sign this): {}", hash);
    println!("   └─ Personal digest: {}", personal_digest(hash.as_slice()));

    Ok(())
}

/// Sign the authorization with a hex private key and print the signature
pub fn cmd_sign(private_key: &str, vault: &Address, nonce: u64, destination: &Address) -> CliResult<()> {
    let key = KeyPair::from_private_key_hex(private_key)?;
    let signature = sign_authorization(&key, vault, nonce, destination);

    println!("✍️  Signed by {}", key.address());
    println!("0x{}", hex::encode(signature));

    Ok(())
}

/// Show one vault, or all vaults, from the saved snapshot
pub fn cmd_info(data_dir: &Path, vault: Option<&Address>) -> CliResult<()> {
    let storage = Storage::new(StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    })?;

    if !storage.exists() {
        println!("📭 No vaults found in {:?}. Start the service with: heir-vault serve", data_dir);
        return Ok(());
    }
    let manager = storage.load()?;

    match vault {
        Some(address) => print_info(&manager.info(address)?),
        None => {
            println!("📋 {} vault(s):", manager.vault_count());
            for v in manager.list_vaults() {
                print_info(&v.info(manager.ledger()));
            }
        }
    }

    Ok(())
}

fn print_info(info: &AccountInfo) {
    println!("\n🔐 Vault {}", info.vault);
    println!("   ├─ Owner: {}", info.owner);
    println!(
        "   ├─ Heirs: {}-of-{}",
        info.threshold,
        info.heirs.len()
    );
    for heir in &info.heirs {
        println!("   │   └─ {}", heir);
    }
    println!("   ├─ Delay: {}s", info.delay_secs);
    println!("   ├─ Nonce: {}", info.nonce);
    println!("   ├─ Balance: {}", info.base_balance);
    match (&info.armed_destination, &info.unlocks_at) {
        (Some(destination), Some(unlocks_at)) => {
            println!("   └─ State: armed for {} (unlocks {})", destination, unlocks_at)
        }
        (Some(destination), None) => println!("   └─ State: armed for {}", destination),
        _ => println!("   └─ State: {}", info.state),
    }
}

//! Service configuration

use crate::storage::StorageConfig;
use alloy_primitives::Address;
use std::path::PathBuf;

/// Settings for the vault service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the snapshot and its backups
    pub data_dir: PathBuf,
    /// Port for the REST API
    pub port: u16,
    /// Candidate tokens scanned by balance discovery
    pub token_catalog: Vec<Address>,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".heir_vault_data"),
            port: 3000,
            token_catalog: Vec::new(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

impl ServiceConfig {
    /// Storage settings derived from this configuration
    pub fn storage(&self) -> StorageConfig {
        StorageConfig {
            data_dir: self.data_dir.clone(),
            backup_enabled: self.backup_enabled,
            max_backups: self.max_backups,
            ..Default::default()
        }
    }

    /// Bind address for the API server
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Parse a comma-separated list of addresses, ignoring blanks
pub fn parse_address_list(input: &str) -> Result<Vec<Address>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Address>()
                .map_err(|e| format!("Invalid address '{}': {}", s, e))
        })
        .collect()
}

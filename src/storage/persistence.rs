//! Vault snapshot persistence
//!
//! Saves the vault manager (every vault plus the asset ledger) as one JSON
//! snapshot, rotating older copies into numbered backups.

use crate::vault::VaultManager;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub snapshot_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".heir_vault_data"),
            snapshot_file: "vaults.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Snapshot storage manager
#[derive(Debug)]
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager, creating the data directory if needed
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    fn snapshot_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.snapshot_file)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.snapshot_file, index))
    }

    /// Save the manager to disk
    pub fn save(&self, manager: &VaultManager) -> Result<(), StorageError> {
        let path = self.snapshot_path();

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to a temporary file, then rename over the snapshot
        let temp_path = self.config.data_dir.join("vaults.tmp");
        let writer = BufWriter::new(fs::File::create(&temp_path)?);
        serde_json::to_writer_pretty(writer, manager)?;
        fs::rename(&temp_path, &path)?;

        log::debug!("Saved {} vault(s) to {:?}", manager.vault_count(), path);
        Ok(())
    }

    /// Load the manager from disk
    pub fn load(&self) -> Result<VaultManager, StorageError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Snapshot file not found".to_string(),
            ));
        }
        load_from_file(&path)
    }

    /// Load the saved snapshot, or start empty if none exists
    pub fn load_or_default(&self) -> Result<VaultManager, StorageError> {
        if self.exists() {
            let manager = self.load()?;
            log::info!("Loaded {} vault(s) from {:?}", manager.vault_count(), self.snapshot_path());
            Ok(manager)
        } else {
            log::info!("No snapshot at {:?}, starting empty", self.snapshot_path());
            Ok(VaultManager::default())
        }
    }

    /// Check if a saved snapshot exists
    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }

    /// Delete the saved snapshot
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.snapshot_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn rotate_backups(&self) -> Result<(), StorageError> {
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }
        Ok(())
    }

    /// Restore from a backup
    pub fn restore_backup(&self, backup_index: usize) -> Result<VaultManager, StorageError> {
        let backup_path = self.backup_path(backup_index);
        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }
        load_from_file(&backup_path)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|i| self.backup_path(*i).exists())
            .collect()
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StorageError> {
        let path = self.snapshot_path();
        let file_size = if path.exists() {
            fs::metadata(&path)?.len()
        } else {
            0
        };

        Ok(StorageStats {
            file_size,
            backup_count: self.list_backups().len(),
            data_dir: self.config.data_dir.clone(),
        })
    }
}

/// Storage statistics
#[derive(Debug)]
pub struct StorageStats {
    pub file_size: u64,
    pub backup_count: usize,
    pub data_dir: PathBuf,
}

/// Save a manager to a specific file path
pub fn save_to_file(manager: &VaultManager, path: &Path) -> Result<(), StorageError> {
    let writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(writer, manager)?;
    Ok(())
}

/// Load a manager from a specific file path
pub fn load_from_file(path: &Path) -> Result<VaultManager, StorageError> {
    let reader = BufReader::new(fs::File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

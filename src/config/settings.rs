use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::errors::{Result, VaultError};

/// Project-level configuration, loaded from `.localvault.toml`.
///
/// Every field has a sensible default so LocalVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the vault file.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Vault file name inside `vault_dir`.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// scrypt cost factor N for new vaults (default: 16 384).
    #[serde(default = "default_scrypt_cost_factor")]
    pub scrypt_cost_factor: u64,

    /// scrypt block size r (default: 8).
    #[serde(default = "default_scrypt_block_size")]
    pub scrypt_block_size: u32,

    /// scrypt parallelism p (default: 1).
    #[serde(default = "default_scrypt_parallelism")]
    pub scrypt_parallelism: u32,

    /// Derived key length in bytes (default: 32).
    #[serde(default = "default_scrypt_key_length")]
    pub scrypt_key_length: usize,

    /// scrypt memory ceiling in bytes (default: 64 MiB).
    #[serde(default = "default_scrypt_memory_limit")]
    pub scrypt_memory_limit: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".localvault".to_string()
}

fn default_vault_file() -> String {
    "vault.json".to_string()
}

fn default_scrypt_cost_factor() -> u64 {
    KdfParams::default().cost_factor
}

fn default_scrypt_block_size() -> u32 {
    KdfParams::default().block_size
}

fn default_scrypt_parallelism() -> u32 {
    KdfParams::default().parallelism
}

fn default_scrypt_key_length() -> usize {
    KdfParams::default().key_length
}

fn default_scrypt_memory_limit() -> u64 {
    KdfParams::default().memory_limit
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            vault_file: default_vault_file(),
            scrypt_cost_factor: default_scrypt_cost_factor(),
            scrypt_block_size: default_scrypt_block_size(),
            scrypt_parallelism: default_scrypt_parallelism(),
            scrypt_key_length: default_scrypt_key_length(),
            scrypt_memory_limit: default_scrypt_memory_limit(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".localvault.toml";

    /// Load settings from `<project_dir>/.localvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `project_dir/.localvault/vault.json`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir).join(&self.vault_file)
    }

    /// Convert the scrypt settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            cost_factor: self.scrypt_cost_factor,
            block_size: self.scrypt_block_size,
            parallelism: self.scrypt_parallelism,
            key_length: self.scrypt_key_length,
            memory_limit: self.scrypt_memory_limit,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

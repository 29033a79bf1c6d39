//! Password-based key derivation using scrypt.
//!
//! scrypt is memory-hard, which raises the cost of offline guessing
//! against a stolen vault file.  The parameters a key was derived with
//! are persisted next to the master credential (`KdfParams`) so old
//! vaults keep opening even if the defaults change later.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Output lengths accepted by the scrypt crate.
const MIN_KEY_LEN: usize = 10;
const MAX_KEY_LEN: usize = 64;

/// scrypt cost parameters, persisted with the master credential.
///
/// Field names on disk follow the conventional scrypt notation
/// (`N`, `r`, `p`, `keyLen`, `maxmem`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// CPU/memory cost factor `N` (a power of two, default: 16 384).
    #[serde(rename = "N")]
    pub cost_factor: u64,
    /// Block size `r` (default: 8).
    #[serde(rename = "r")]
    pub block_size: u32,
    /// Parallelism `p` (default: 1).
    #[serde(rename = "p")]
    pub parallelism: u32,
    /// Derived key length in bytes (default: 32).
    #[serde(rename = "keyLen")]
    pub key_length: usize,
    /// Ceiling on the working memory in bytes (default: 64 MiB).
    #[serde(rename = "maxmem")]
    pub memory_limit: u64,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            cost_factor: 16_384,
            block_size: 8,
            parallelism: 1,
            key_length: 32,
            memory_limit: 64 * 1024 * 1024,
        }
    }
}

impl KdfParams {
    /// Bytes of working memory scrypt needs for these parameters:
    /// `128 * r * (N + p + 2)`.
    ///
    /// Returns `None` on overflow, which is treated as "too large".
    pub fn required_memory(&self) -> Option<u64> {
        let r = u64::from(self.block_size);
        let p = u64::from(self.parallelism);
        self.cost_factor
            .checked_add(p)?
            .checked_add(2)?
            .checked_mul(r)?
            .checked_mul(128)
    }

    /// Check positivity, shape and the memory ceiling.
    pub fn validate(&self) -> Result<()> {
        if self.cost_factor == 0
            || self.block_size == 0
            || self.parallelism == 0
            || self.key_length == 0
            || self.memory_limit == 0
        {
            return Err(VaultError::KdfFailure(
                "scrypt parameters must all be positive".into(),
            ));
        }
        if self.cost_factor < 2 || !self.cost_factor.is_power_of_two() {
            return Err(VaultError::KdfFailure(format!(
                "scrypt N must be a power of two greater than 1 (got {})",
                self.cost_factor
            )));
        }
        if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&self.key_length) {
            return Err(VaultError::KdfFailure(format!(
                "scrypt key length must be between {MIN_KEY_LEN} and {MAX_KEY_LEN} bytes (got {})",
                self.key_length
            )));
        }
        match self.required_memory() {
            Some(needed) if needed <= self.memory_limit => Ok(()),
            Some(needed) => Err(VaultError::KdfFailure(format!(
                "scrypt needs {needed} bytes of memory, above the limit of {}",
                self.memory_limit
            ))),
            None => Err(VaultError::KdfFailure(
                "scrypt memory requirement overflows".into(),
            )),
        }
    }

    fn to_scrypt(self) -> Result<scrypt::Params> {
        let log_n = u8::try_from(self.cost_factor.trailing_zeros())
            .map_err(|_| VaultError::KdfFailure("scrypt N is too large".into()))?;
        scrypt::Params::new(log_n, self.block_size, self.parallelism, self.key_length)
            .map_err(|e| VaultError::KdfFailure(format!("invalid scrypt params: {e}")))
    }
}

/// Derive a key of `params.key_length` bytes from a passphrase and salt.
///
/// The same passphrase + salt + params will always produce the same key.
pub fn derive_key(passphrase: &[u8], salt: &[u8], params: &KdfParams) -> Result<Zeroizing<Vec<u8>>> {
    params.validate()?;
    let scrypt_params = params.to_scrypt()?;

    let mut key = Zeroizing::new(vec![0u8; params.key_length]);
    scrypt::scrypt(passphrase, salt, &scrypt_params, key.as_mut_slice())
        .map_err(|e| VaultError::KdfFailure(format!("scrypt failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Compare a freshly derived key to the stored master hash.
///
/// Lengths are compared first; the bytes themselves are compared in
/// constant time.
pub fn verify_master_hash(stored: &[u8], derived: &[u8]) -> bool {
    if stored.len() != derived.len() {
        return false;
    }
    stored.ct_eq(derived).into()
}

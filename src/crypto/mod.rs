//! Cryptographic primitives for LocalVault.
//!
//! This module provides:
//! - scrypt password-based key derivation (`kdf`)
//! - AES-256-GCM entry encryption bound to associated data (`cipher`)
//! - The serialized envelope type (`envelope`)
//! - The zeroizing in-memory key (`keys`)

pub mod cipher;
pub mod envelope;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use cipher::{decrypt, encrypt};
pub use envelope::SecretEnvelope;
pub use kdf::{derive_key, generate_salt, verify_master_hash, KdfParams};
pub use keys::MasterKey;

//! The durable vault record and its parts.
//!
//! A vault file is a single pretty-printed JSON document:
//!
//! ```text
//! { version, updatedAt, master: MasterCredential | null, entries: [EntryRecord] }
//! ```
//!
//! The same shape is used for the primary vault, exported backups and
//! import sources.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::crypto::envelope::{base64_decode, base64_encode};
use crate::crypto::{KdfParams, SecretEnvelope};

/// Current record format version.
pub const CURRENT_VERSION: &str = "1.0.0";

/// Length of a freshly minted entry id in random bytes (hex doubles it).
const ENTRY_ID_BYTES: usize = 16;

fn current_version() -> String {
    CURRENT_VERSION.to_string()
}

/// KDF algorithm tag stored with the master credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KdfAlgorithm {
    #[serde(rename = "scrypt")]
    Scrypt,
}

/// The stored master credential.
///
/// `hash` is the scrypt output itself; it doubles as the vault's
/// symmetric key once a passphrase has been verified against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterCredential {
    pub algorithm: KdfAlgorithm,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub hash: Vec<u8>,

    pub params: KdfParams,
}

/// A single titled secret.  Title and note are plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub id: String,
    pub title: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "passwordCrypto", alias = "secretEnvelope")]
    pub envelope: SecretEnvelope,
}

impl EntryRecord {
    /// Metadata view of this entry (no envelope).
    pub fn meta(&self) -> EntryMeta {
        EntryMeta {
            id: self.id.clone(),
            title: self.title.clone(),
            note: self.note.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Lightweight metadata about an entry (no envelope).
///
/// Returned by list/add/update so callers can display entries without
/// touching any ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub id: String,
    pub title: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The whole vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    /// Missing in some older files; defaulted on load.
    #[serde(rename = "version", alias = "formatVersion", default = "current_version")]
    pub format_version: String,

    pub updated_at: DateTime<Utc>,

    /// `None` until setup has run once.
    pub master: Option<MasterCredential>,

    /// Newest first.
    pub entries: Vec<EntryRecord>,
}

impl VaultRecord {
    /// An empty record with no master credential (first-run state).
    pub fn empty() -> Self {
        Self {
            format_version: current_version(),
            updated_at: Utc::now(),
            master: None,
            entries: Vec::new(),
        }
    }

    /// Find an entry by id.
    pub fn entry(&self, id: &str) -> Option<&EntryRecord> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Refresh `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Mint a fresh random entry id (32 lowercase hex characters).
pub fn new_entry_id() -> String {
    let mut bytes = [0u8; ENTRY_ID_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

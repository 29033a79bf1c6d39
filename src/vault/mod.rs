//! Vault module: records, persistence, session and import.
//!
//! This module provides:
//! - The durable record types (`record`)
//! - Byte backends and the `RecordStore` (`store`)
//! - Structural validation of untrusted files (`validate`)
//! - The `VaultSession` state machine and entry operations (`session`)
//! - The cross-vault importer (`import`)

pub mod import;
pub mod record;
pub mod session;
pub mod store;
pub mod validate;

// Re-export the most commonly used items.
pub use import::{import_parsed, import_vault, ImportSummary};
pub use record::{EntryMeta, EntryRecord, MasterCredential, VaultRecord};
pub use session::{EntryUpdate, NewEntry, SessionState, VaultSession, VaultStatus};
pub use store::{FileBackend, MemoryBackend, RecordStore, VaultBackend};
pub use validate::ParsedVault;

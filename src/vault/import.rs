//! Merging a foreign vault file into the local vault.
//!
//! Foreign entries are never copied as-is.  Each one is decrypted under
//! the foreign key, then re-encrypted under the local key with a newly
//! minted id, so the merged copies have no tie to the foreign key
//! material or the foreign ids.
//!
//! The merge is all-or-nothing: either every foreign entry is re-keyed
//! and the local record is saved once, or nothing is written.

use tracing::{debug, info};

use super::record::{new_entry_id, EntryRecord};
use super::session::VaultSession;
use super::store::VaultBackend;
use super::validate::ParsedVault;
use crate::crypto::{decrypt, derive_key, encrypt, verify_master_hash};
use crate::errors::{Result, VaultError};

/// What an import added to the local vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
}

/// Import a foreign vault file from raw bytes.
pub fn import_vault<B: VaultBackend>(
    session: &VaultSession<B>,
    foreign_bytes: &[u8],
    foreign_passphrase: &str,
) -> Result<ImportSummary> {
    import_parsed(session, ParsedVault::parse(foreign_bytes), foreign_passphrase)
}

/// Import an already parsed foreign vault.
///
/// Order matters: the local session is checked first, structure second,
/// the foreign passphrase third.  No key is derived for a malformed file
/// and no entry is decrypted with an unverified key.
pub fn import_parsed<B: VaultBackend>(
    session: &VaultSession<B>,
    parsed: ParsedVault,
    foreign_passphrase: &str,
) -> Result<ImportSummary> {
    let local_key = session.key()?;

    let foreign = match parsed {
        ParsedVault::Valid(record) => record,
        ParsedVault::Invalid(reason) => return Err(VaultError::InvalidFile(reason)),
    };
    let master = foreign
        .master
        .as_ref()
        .ok_or_else(|| VaultError::InvalidFile("no master credential".into()))?;

    if foreign_passphrase.is_empty() {
        return Err(VaultError::WrongPassphrase);
    }

    // The foreign file chose these params; if they are unusable the
    // file is at fault.
    let foreign_key = derive_key(foreign_passphrase.as_bytes(), &master.salt, &master.params)
        .map_err(|e| match e {
            VaultError::KdfFailure(reason) => VaultError::InvalidFile(reason),
            other => other,
        })?;
    if !verify_master_hash(&master.hash, &foreign_key) {
        return Err(VaultError::WrongPassphrase);
    }

    let mut rekeyed = Vec::with_capacity(foreign.entries.len());
    for (index, entry) in foreign.entries.iter().enumerate() {
        let secret = decrypt(&foreign_key, &entry.envelope, &entry.id).map_err(|_| {
            VaultError::InvalidFile(format!("entry {index} could not be decrypted"))
        })?;

        let id = new_entry_id();
        let envelope = encrypt(local_key.as_bytes(), &secret, &id)?;
        rekeyed.push(EntryRecord {
            id,
            title: entry.title.clone(),
            note: entry.note.clone(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            envelope,
        });
    }
    debug!(count = rekeyed.len(), "re-encrypted foreign entries");

    let mut record = session.store().load_or_empty()?;
    let imported = rekeyed.len();
    record.entries.extend(rekeyed);
    record.touch();
    session.store().save(&record)?;

    info!(imported, "imported entries from foreign vault");
    Ok(ImportSummary { imported })
}

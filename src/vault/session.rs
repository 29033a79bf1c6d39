//! The vault session: master credential lifecycle and entry operations.
//!
//! A `VaultSession` is in one of three states:
//!
//! - **NoMaster**: no credential set up yet (initial).
//! - **Locked**: credential exists, no key in memory.
//! - **Unlocked**: key in memory.
//!
//! Every mutating operation reads the whole record, mutates it in
//! memory and writes the whole record back.  Callers serialize access;
//! `&mut self` on mutations enforces that per session.

use chrono::Utc;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::record::{
    new_entry_id, EntryMeta, EntryRecord, KdfAlgorithm, MasterCredential, VaultRecord,
};
use super::store::{FileBackend, RecordStore, VaultBackend};
use crate::crypto::{decrypt, derive_key, encrypt, generate_salt, verify_master_hash};
use crate::crypto::{KdfParams, MasterKey};
use crate::errors::{Result, VaultError};

/// Minimum passphrase length accepted by `setup`.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// AES-256 needs exactly this many key bytes.
const AES_KEY_LEN: usize = 32;

/// Where a session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoMaster,
    Locked,
    Unlocked,
}

/// Summary for callers that render a lock screen or status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultStatus {
    pub has_master: bool,
    pub unlocked: bool,
    pub entry_count: usize,
}

/// Input for `add_entry`.
#[derive(Debug, Clone, Copy)]
pub struct NewEntry<'a> {
    pub title: &'a str,
    pub note: &'a str,
    pub secret: &'a str,
}

/// Input for `update_entry`.  `secret: None` (or empty) keeps the
/// existing envelope.
#[derive(Debug, Clone, Copy)]
pub struct EntryUpdate<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub note: &'a str,
    pub secret: Option<&'a str>,
}

/// The main vault handle.
pub struct VaultSession<B: VaultBackend = FileBackend> {
    store: RecordStore<B>,

    /// Parameters used when `setup` creates a new credential.  Unlock
    /// always uses the parameters stored with the credential.
    kdf_params: KdfParams,

    /// The unlocked key (zeroized on drop).  `None` while locked.
    key: Option<MasterKey>,
}

impl<B: VaultBackend> VaultSession<B> {
    /// Create a locked session over `store`.  No I/O happens here.
    pub fn new(store: RecordStore<B>, kdf_params: KdfParams) -> Self {
        Self {
            store,
            kdf_params,
            key: None,
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Current lifecycle state.
    pub fn state(&self) -> Result<SessionState> {
        if self.key.is_some() {
            return Ok(SessionState::Unlocked);
        }
        match self.store.load()? {
            Some(record) if record.master.is_some() => Ok(SessionState::Locked),
            _ => Ok(SessionState::NoMaster),
        }
    }

    /// Whether a key is currently held in memory.
    pub fn is_unlocked(&self) -> bool {
        self.key.is_some()
    }

    /// Credential presence, lock state and entry count.
    pub fn status(&self) -> Result<VaultStatus> {
        let record = self.store.load_or_empty()?;
        Ok(VaultStatus {
            has_master: record.master.is_some(),
            unlocked: self.key.is_some(),
            entry_count: record.entries.len(),
        })
    }

    /// The record store this session reads and writes.
    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    // ------------------------------------------------------------------
    // Master credential lifecycle
    // ------------------------------------------------------------------

    /// Create the master credential and unlock.
    ///
    /// Single-use: once a credential exists this fails with
    /// `AlreadyInitialized` and leaves the file untouched.
    pub fn setup(&mut self, passphrase: &str) -> Result<()> {
        if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
            return Err(VaultError::WeakPassphrase(MIN_PASSPHRASE_LEN));
        }

        let existing = self.store.load_or_empty()?;
        if existing.master.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }

        if self.kdf_params.key_length != AES_KEY_LEN {
            return Err(VaultError::KdfFailure(format!(
                "key length must be {AES_KEY_LEN} bytes for AES-256-GCM (got {})",
                self.kdf_params.key_length
            )));
        }

        let salt = generate_salt();
        let derived = derive_key(passphrase.as_bytes(), &salt, &self.kdf_params)?;

        let record = VaultRecord {
            master: Some(MasterCredential {
                algorithm: KdfAlgorithm::Scrypt,
                salt: salt.to_vec(),
                hash: derived.to_vec(),
                params: self.kdf_params,
            }),
            ..VaultRecord::empty()
        };
        self.store.save(&record)?;

        self.key = Some(MasterKey::new(derived));
        info!(path = %self.store.location().display(), "master passphrase set up");
        Ok(())
    }

    /// Verify `passphrase` against the stored credential and unlock.
    ///
    /// On mismatch the session keeps whatever key it had (none, if it
    /// was locked).
    pub fn unlock(&mut self, passphrase: &str) -> Result<()> {
        let record = self.store.load_or_empty()?;
        let master = record.master.ok_or(VaultError::MasterNotSet)?;

        // The stored hash is used directly as the AES-256 key.
        if master.params.key_length != AES_KEY_LEN || master.hash.len() != AES_KEY_LEN {
            return Err(VaultError::InvalidFile(format!(
                "stored key length must be {AES_KEY_LEN} bytes (got {})",
                master.params.key_length
            )));
        }

        if passphrase.is_empty() {
            return Err(VaultError::WrongPassphrase);
        }

        let derived = derive_key(passphrase.as_bytes(), &master.salt, &master.params)?;
        if !verify_master_hash(&master.hash, &derived) {
            warn!("unlock rejected: passphrase does not match");
            return Err(VaultError::WrongPassphrase);
        }

        self.key = Some(MasterKey::new(derived));
        info!("vault unlocked");
        Ok(())
    }

    /// Discard the in-memory key.
    pub fn lock(&mut self) {
        if self.key.take().is_some() {
            info!("vault locked");
        }
    }

    /// Lock and overwrite the vault with an empty record (no credential).
    ///
    /// Every entry is lost; callers should confirm with the user first.
    pub fn reset(&mut self) -> Result<()> {
        self.lock();
        self.store.save(&VaultRecord::empty())?;
        info!(path = %self.store.location().display(), "vault reset");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Metadata for every entry, newest first.
    pub fn list_entries(&self) -> Result<Vec<EntryMeta>> {
        self.key()?;
        let record = self.store.load_or_empty()?;
        Ok(record.entries.iter().map(EntryRecord::meta).collect())
    }

    /// Encrypt and prepend a new entry.
    pub fn add_entry(&mut self, entry: NewEntry<'_>) -> Result<EntryMeta> {
        let key = self.key()?;
        let title = validate_title(entry.title)?;
        if entry.secret.is_empty() {
            return Err(VaultError::InvalidInput("secret cannot be empty".into()));
        }

        let mut record = self.store.load_or_empty()?;

        let id = new_entry_id();
        let envelope = encrypt(key.as_bytes(), entry.secret, &id)?;
        let now = Utc::now();
        let new_entry = EntryRecord {
            id,
            title,
            note: entry.note.trim().to_string(),
            created_at: now,
            updated_at: now,
            envelope,
        };
        let meta = new_entry.meta();

        record.entries.insert(0, new_entry);
        record.touch();
        self.store.save(&record)?;

        debug!(id = %meta.id, "entry added");
        Ok(meta)
    }

    /// Change title and note; re-encrypt only when a new secret is given.
    pub fn update_entry(&mut self, update: EntryUpdate<'_>) -> Result<EntryMeta> {
        let key = self.key()?;
        let title = validate_title(update.title)?;

        let mut record = self.store.load_or_empty()?;
        let target = record
            .entries
            .iter_mut()
            .find(|e| e.id == update.id)
            .ok_or_else(|| VaultError::NotFound(update.id.to_string()))?;

        target.title = title;
        target.note = update.note.trim().to_string();
        target.updated_at = Utc::now();
        if let Some(secret) = update.secret.filter(|s| !s.is_empty()) {
            target.envelope = encrypt(key.as_bytes(), secret, &target.id)?;
        }
        let meta = target.meta();

        record.touch();
        self.store.save(&record)?;

        debug!(id = %meta.id, "entry updated");
        Ok(meta)
    }

    /// Remove an entry.  Returns `false` if no entry has this id.
    pub fn remove_entry(&mut self, id: &str) -> Result<bool> {
        self.key()?;

        let mut record = self.store.load_or_empty()?;
        let before = record.entries.len();
        record.entries.retain(|e| e.id != id);
        if record.entries.len() == before {
            return Ok(false);
        }

        record.touch();
        self.store.save(&record)?;

        debug!(id, "entry removed");
        Ok(true)
    }

    /// Decrypt one entry's secret.  Nothing is cached.
    pub fn reveal_entry(&self, id: &str) -> Result<Zeroizing<String>> {
        let key = self.key()?;
        let record = self.store.load_or_empty()?;
        let entry = record
            .entry(id)
            .ok_or_else(|| VaultError::NotFound(id.to_string()))?;

        decrypt(key.as_bytes(), &entry.envelope, &entry.id)
    }

    // ------------------------------------------------------------------
    // Backup
    // ------------------------------------------------------------------

    /// Copy the current record, unchanged, to another store.
    ///
    /// The copy has the same shape `import` consumes.  Returns the number
    /// of entries written.
    pub fn export_to<T: VaultBackend>(&self, target: &RecordStore<T>) -> Result<usize> {
        self.key()?;
        let record = self.store.load_or_empty()?;
        target.save(&record)?;

        info!(
            path = %target.location().display(),
            entries = record.entries.len(),
            "vault exported"
        );
        Ok(record.entries.len())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// The unlocked key, or `UnlockRequired`.
    pub(crate) fn key(&self) -> Result<&MasterKey> {
        self.key.as_ref().ok_or(VaultError::UnlockRequired)
    }
}

/// Trim a title and reject it if nothing is left.
fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(VaultError::InvalidInput("title cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::store::MemoryBackend;

    fn fast_params() -> KdfParams {
        KdfParams {
            cost_factor: 1024,
            ..KdfParams::default()
        }
    }

    fn session(backend: &MemoryBackend) -> VaultSession<&MemoryBackend> {
        VaultSession::new(RecordStore::new(backend, "vault.json"), fast_params())
    }

    #[test]
    fn fresh_session_has_no_master() {
        let backend = MemoryBackend::new();
        let s = session(&backend);
        assert_eq!(s.state().unwrap(), SessionState::NoMaster);
        assert!(!s.is_unlocked());
    }

    #[test]
    fn setup_rejects_short_passphrase() {
        let backend = MemoryBackend::new();
        let mut s = session(&backend);
        assert!(matches!(s.setup("short"), Err(VaultError::WeakPassphrase(8))));
        assert!(s.store().load().unwrap().is_none());
    }

    #[test]
    fn setup_rejects_non_aes_key_length() {
        let backend = MemoryBackend::new();
        let mut s = VaultSession::new(
            RecordStore::new(&backend, "vault.json"),
            KdfParams {
                key_length: 16,
                ..fast_params()
            },
        );
        assert!(matches!(
            s.setup("long enough"),
            Err(VaultError::KdfFailure(_))
        ));
    }

    #[test]
    fn setup_persists_credential_with_params() {
        let backend = MemoryBackend::new();
        let mut s = session(&backend);
        s.setup("correcthorse1").unwrap();

        let record = s.store().load().unwrap().unwrap();
        let master = record.master.unwrap();
        assert_eq!(master.params, fast_params());
        assert_eq!(master.salt.len(), 16);
        assert_eq!(master.hash.len(), 32);
        assert!(record.entries.is_empty());
    }

    #[test]
    fn unlock_without_master_fails() {
        let backend = MemoryBackend::new();
        let mut s = session(&backend);
        assert!(matches!(
            s.unlock("whatever1"),
            Err(VaultError::MasterNotSet)
        ));
    }

    #[test]
    fn unlock_rejects_credential_with_wrong_key_length() {
        let backend = MemoryBackend::new();
        let params = KdfParams {
            key_length: 16,
            ..fast_params()
        };
        let salt = generate_salt();
        let hash = derive_key(b"correcthorse1", &salt, &params).unwrap();
        let record = VaultRecord {
            master: Some(MasterCredential {
                algorithm: KdfAlgorithm::Scrypt,
                salt: salt.to_vec(),
                hash: hash.to_vec(),
                params,
            }),
            ..VaultRecord::empty()
        };
        RecordStore::new(&backend, "vault.json").save(&record).unwrap();

        let mut s = session(&backend);
        assert!(matches!(
            s.unlock("correcthorse1"),
            Err(VaultError::InvalidFile(_))
        ));
        assert!(!s.is_unlocked());
    }

    #[test]
    fn empty_passphrase_never_unlocks() {
        let backend = MemoryBackend::new();
        session(&backend).setup("correcthorse1").unwrap();

        let mut s = session(&backend);
        assert!(matches!(s.unlock(""), Err(VaultError::WrongPassphrase)));
        assert_eq!(s.state().unwrap(), SessionState::Locked);
    }

    #[test]
    fn entry_operations_require_unlock() {
        let backend = MemoryBackend::new();
        session(&backend).setup("correcthorse1").unwrap();
        let mut s = session(&backend);

        let new = NewEntry {
            title: "bank",
            note: "",
            secret: "p@ss",
        };
        assert!(matches!(s.add_entry(new), Err(VaultError::UnlockRequired)));
        assert!(matches!(s.list_entries(), Err(VaultError::UnlockRequired)));
        assert!(matches!(s.remove_entry("x"), Err(VaultError::UnlockRequired)));
        assert!(matches!(s.reveal_entry("x"), Err(VaultError::UnlockRequired)));
        let update = EntryUpdate {
            id: "x",
            title: "t",
            note: "",
            secret: None,
        };
        assert!(matches!(s.update_entry(update), Err(VaultError::UnlockRequired)));
    }

    #[test]
    fn add_trims_and_validates_input() {
        let backend = MemoryBackend::new();
        let mut s = session(&backend);
        s.setup("correcthorse1").unwrap();

        let meta = s
            .add_entry(NewEntry {
                title: "  bank  ",
                note: " checking ",
                secret: "p@ss",
            })
            .unwrap();
        assert_eq!(meta.title, "bank");
        assert_eq!(meta.note, "checking");

        let blank_title = NewEntry {
            title: "   ",
            note: "",
            secret: "x",
        };
        assert!(matches!(s.add_entry(blank_title), Err(VaultError::InvalidInput(_))));

        let blank_secret = NewEntry {
            title: "mail",
            note: "",
            secret: "",
        };
        assert!(matches!(s.add_entry(blank_secret), Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn envelope_is_bound_to_entry_id() {
        let backend = MemoryBackend::new();
        let mut s = session(&backend);
        s.setup("correcthorse1").unwrap();
        let meta = s
            .add_entry(NewEntry {
                title: "bank",
                note: "",
                secret: "p@ss",
            })
            .unwrap();

        let record = s.store().load().unwrap().unwrap();
        assert_eq!(record.entries[0].envelope.associated_data, meta.id);
    }
}

//! Reading and writing vault records through a byte backend.
//!
//! `RecordStore` binds a `VaultBackend` to one location.  It caches
//! nothing: every `load` re-reads the backend and every `save` replaces
//! the whole record.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::record::VaultRecord;
use crate::errors::{Result, VaultError};

/// A byte source/sink for vault files.
pub trait VaultBackend {
    /// Read all bytes at `location`, or `None` if nothing exists there.
    fn read(&self, location: &Path) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is at `location` with `bytes`.
    fn write(&self, location: &Path, bytes: &[u8]) -> Result<()>;
}

/// Filesystem backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileBackend;

impl VaultBackend for FileBackend {
    fn read(&self, location: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(location) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write **atomically**: temp file in the same directory, then rename,
    /// so readers never see a half-written file.
    fn write(&self, location: &Path, bytes: &[u8]) -> Result<()> {
        let parent = match location.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = parent.join(format!(
            ".{}.tmp",
            location.file_name().unwrap_or_default().to_string_lossy()
        ));

        fs::write(&tmp_path, bytes)?;

        // On Unix, restrict permissions to owner-only read/write.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, location)?;
        Ok(())
    }
}

/// In-process backend, keyed by location.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VaultBackend for MemoryBackend {
    fn read(&self, location: &Path) -> Result<Option<Vec<u8>>> {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(files.get(location).cloned())
    }

    fn write(&self, location: &Path, bytes: &[u8]) -> Result<()> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.insert(location.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

impl<B: VaultBackend + ?Sized> VaultBackend for &B {
    fn read(&self, location: &Path) -> Result<Option<Vec<u8>>> {
        (**self).read(location)
    }

    fn write(&self, location: &Path, bytes: &[u8]) -> Result<()> {
        (**self).write(location, bytes)
    }
}

/// A vault record at one location of one backend.
#[derive(Debug, Clone)]
pub struct RecordStore<B: VaultBackend = FileBackend> {
    backend: B,
    location: PathBuf,
}

impl RecordStore<FileBackend> {
    /// Shorthand for a filesystem-backed store.
    pub fn file(location: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend, location)
    }
}

impl<B: VaultBackend> RecordStore<B> {
    pub fn new(backend: B, location: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            location: location.into(),
        }
    }

    /// Returns the location this store reads and writes.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Returns the raw bytes at the location, if any.
    pub fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        self.backend.read(&self.location)
    }

    /// Load the record.
    ///
    /// `Ok(None)` means nothing has been written yet (first run).
    /// Bytes that do not parse are reported, never repaired.
    pub fn load(&self) -> Result<Option<VaultRecord>> {
        let Some(bytes) = self.backend.read(&self.location)? else {
            return Ok(None);
        };

        let record: VaultRecord = serde_json::from_slice(&bytes)
            .map_err(|e| VaultError::InvalidFile(format!("{}: {e}", self.location.display())))?;

        Ok(Some(record))
    }

    /// Load the record, or an empty one on first run.
    pub fn load_or_empty(&self) -> Result<VaultRecord> {
        Ok(self.load()?.unwrap_or_else(VaultRecord::empty))
    }

    /// Serialize and write the full record (full-file replace).
    pub fn save(&self, record: &VaultRecord) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| VaultError::Serialization(format!("vault record: {e}")))?;

        self.backend.write(&self.location, &bytes)?;
        debug!(
            path = %self.location.display(),
            entries = record.entries.len(),
            "saved vault record"
        );
        Ok(())
    }
}

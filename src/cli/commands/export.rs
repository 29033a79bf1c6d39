//! `localvault export`: write a backup copy of the vault file.
//!
//! The backup has exactly the shape of the vault file, so it can be
//! restored on another machine with `localvault import`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::cli::{unlocked_session, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::RecordStore;

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: &str) -> Result<()> {
    let session = unlocked_session(cli)?;
    let dest = Path::new(output_path);

    // Safety: refuse to export over the live vault.
    if resolve(dest) == resolve(session.store().location()) {
        return Err(VaultError::CommandFailed(
            "refusing to export over the vault file itself".into(),
        ));
    }

    let count = session.export_to(&RecordStore::file(dest))?;

    output::success(&format!("Exported {count} entries to {}", dest.display()));
    output::tip("The backup is still protected by the current master passphrase.");

    Ok(())
}

/// Absolute form of `path` with its parent directory canonicalized, so
/// relative paths and symlinked directories compare equal.  A path whose
/// parent does not exist is returned unchanged.
fn resolve(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

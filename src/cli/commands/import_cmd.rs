//! `localvault import`: merge entries from another vault file.
//!
//! The source's passphrase is verified, every entry is decrypted with
//! the source key and re-encrypted under this vault's key.  Nothing is
//! written unless every entry succeeds.

use std::path::Path;

use crate::cli::output;
use crate::cli::{prompt_import_password, unlocked_session, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::{import_vault, RecordStore};

/// Execute the `import` command.
pub fn execute(cli: &Cli, file_path: &str) -> Result<()> {
    let source = Path::new(file_path);

    let bytes = RecordStore::file(source).read_bytes()?.ok_or_else(|| {
        VaultError::CommandFailed(format!("import file not found: {}", source.display()))
    })?;

    let session = unlocked_session(cli)?;
    let source_password = prompt_import_password()?;

    let summary = import_vault(&session, &bytes, &source_password)?;

    output::success(&format!(
        "Imported {} entries from {}",
        summary.imported,
        source.display()
    ));

    Ok(())
}

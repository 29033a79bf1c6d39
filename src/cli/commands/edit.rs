//! `localvault edit`: change an entry's title, note or secret.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{read_secret, unlocked_session, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::EntryUpdate;

/// Execute the `edit` command.
///
/// Omitted fields keep their current values.  The secret is only
/// re-encrypted when `--secret` is passed.
pub fn execute(
    cli: &Cli,
    id: &str,
    title: Option<&str>,
    note: Option<&str>,
    new_secret: bool,
) -> Result<()> {
    let mut session = unlocked_session(cli)?;

    let current = session
        .list_entries()?
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| VaultError::NotFound(id.to_string()))?;

    let secret: Option<Zeroizing<String>> = if new_secret {
        Some(read_secret(&format!("Enter new secret for {}", current.title))?)
    } else {
        None
    };

    let updated = session.update_entry(EntryUpdate {
        id,
        title: title.unwrap_or(&current.title),
        note: note.unwrap_or(&current.note),
        secret: secret.as_deref().map(String::as_str),
    })?;

    output::success(&format!("Updated '{}' ({})", updated.title, updated.id));

    Ok(())
}

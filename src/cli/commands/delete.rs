//! `localvault delete`: remove an entry from the vault.

use crate::cli::output;
use crate::cli::{confirm, unlocked_session, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete entry '{id}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut session = unlocked_session(cli)?;
    if !session.remove_entry(id)? {
        return Err(VaultError::NotFound(id.to_string()));
    }

    output::success(&format!("Deleted entry '{id}'"));

    Ok(())
}

//! `localvault add`: encrypt and store a new entry.

use crate::cli::output;
use crate::cli::{read_secret, unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::NewEntry;

/// Execute the `add` command.
pub fn execute(cli: &Cli, title: &str, note: &str) -> Result<()> {
    let mut session = unlocked_session(cli)?;

    // Piped stdin or an interactive secure prompt; never a CLI argument.
    let secret = read_secret(&format!("Enter secret for {title}"))?;

    let entry = session.add_entry(NewEntry {
        title,
        note,
        secret: &secret,
    })?;

    output::success(&format!("Added '{}' ({})", entry.title, entry.id));
    output::tip(&format!("Run `localvault show {}` to reveal it.", entry.id));

    Ok(())
}

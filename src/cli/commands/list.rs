//! `localvault list`: display all entries in a table.

use crate::cli::output;
use crate::cli::{unlocked_session, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = unlocked_session(cli)?;
    let entries = session.list_entries()?;

    output::info(&format!("{} entr(ies)", entries.len()));
    output::print_entries_table(&entries);

    Ok(())
}

//! `localvault reset`: erase the vault, including the master passphrase.

use crate::cli::output;
use crate::cli::{confirm, session, Cli};
use crate::errors::Result;

/// Execute the `reset` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    if !force
        && !confirm("Erase every entry and the master passphrase? This cannot be undone.")?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut session = session(cli)?;
    session.reset()?;

    output::success("Vault erased.");
    output::tip("Run `localvault init` to set up a new master passphrase.");

    Ok(())
}

//! `localvault init`: set up the master passphrase for a new vault.

use crate::cli::output;
use crate::cli::{prompt_new_password, session, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::SessionState;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut session = session(cli)?;

    // Fail before prompting if a credential already exists.
    if session.state()? != SessionState::NoMaster {
        output::tip("Use `localvault add <TITLE>` to add entries to the existing vault.");
        return Err(VaultError::AlreadyInitialized);
    }

    let password = prompt_new_password()?;
    session.setup(&password)?;

    output::success(&format!(
        "Vault created at {}",
        session.store().location().display()
    ));
    output::tip("Run `localvault add <TITLE>` to add an entry.");
    output::tip("Run `localvault list` to see all entries.");

    Ok(())
}

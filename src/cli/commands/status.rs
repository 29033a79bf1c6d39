//! `localvault status`: report whether the vault is set up.

use crate::cli::output;
use crate::cli::{session, Cli};
use crate::errors::Result;

/// Execute the `status` command.  Never prompts for a passphrase.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = session(cli)?;
    let status = session.status()?;
    let location = session.store().location().display();

    if !status.has_master {
        output::info(&format!("No vault set up at {location}"));
        output::tip("Run `localvault init` to create one.");
        return Ok(());
    }

    output::info(&format!(
        "Vault at {location}: {} entr{}",
        status.entry_count,
        if status.entry_count == 1 { "y" } else { "ies" }
    ));

    Ok(())
}

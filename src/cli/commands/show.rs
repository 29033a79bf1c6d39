//! `localvault show`: decrypt and print a single entry's secret.

use crate::cli::{unlocked_session, Cli};
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    let session = unlocked_session(cli)?;

    // Decrypt and print the secret to stdout.
    let secret = session.reveal_entry(id)?;
    println!("{}", secret.as_str());

    Ok(())
}

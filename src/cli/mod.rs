//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::{Zeroize, Zeroizing};

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::session::MIN_PASSPHRASE_LEN;
use crate::vault::{RecordStore, VaultSession};

/// Environment variable holding the vault passphrase (scripted use).
pub const PASSWORD_ENV: &str = "LOCALVAULT_PASSWORD";

/// Environment variable holding the passphrase of an import source.
pub const IMPORT_PASSWORD_ENV: &str = "LOCALVAULT_IMPORT_PASSWORD";

/// LocalVault CLI: local credential vault.
#[derive(Parser)]
#[command(name = "localvault", about = "Local encrypted credential vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: from .localvault.toml, else .localvault)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Set up the master passphrase for a new vault
    Init,

    /// Show whether the vault is set up and how many entries it holds
    Status,

    /// Add an entry (the secret is prompted for or read from stdin)
    Add {
        /// Entry title (e.g. "bank")
        title: String,
        /// Free-form plaintext note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// List all entries
    List,

    /// Reveal an entry's secret
    Show {
        /// Entry id (see `list`)
        id: String,
    },

    /// Change an entry's title, note or secret
    Edit {
        /// Entry id
        id: String,
        /// New title (keeps the current one if omitted)
        #[arg(short, long)]
        title: Option<String>,
        /// New note (keeps the current one if omitted)
        #[arg(short, long)]
        note: Option<String>,
        /// Prompt for a new secret
        #[arg(short, long)]
        secret: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Write a backup copy of the vault file
    Export {
        /// Destination path
        output: String,
    },

    /// Merge entries from another vault file (re-encrypted under this vault's key)
    Import {
        /// Path to the vault file to import
        file: String,
    },

    /// Erase the vault, including the master passphrase
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings for the current directory, applying CLI overrides.
fn load_settings(cli: &Cli) -> Result<(PathBuf, Settings)> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(dir) = &cli.vault_dir {
        settings.vault_dir = dir.clone();
    }
    Ok((cwd, settings))
}

/// Build a locked session over the configured vault file.
///
/// Example location: `<cwd>/.localvault/vault.json`
pub fn session(cli: &Cli) -> Result<VaultSession> {
    let (cwd, settings) = load_settings(cli)?;
    Ok(VaultSession::new(
        RecordStore::file(settings.vault_path(&cwd)),
        settings.kdf_params(),
    ))
}

/// Build a session and unlock it with the user's passphrase.
pub fn unlocked_session(cli: &Cli) -> Result<VaultSession> {
    let mut session = session(cli)?;
    let password = prompt_password()?;
    session.unlock(&password)?;
    Ok(session)
}

/// Get the vault password, trying in order:
/// 1. `LOCALVAULT_PASSWORD` env var
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    password_from_env_or_prompt(PASSWORD_ENV, "Enter master passphrase")
}

/// Get the passphrase of a vault being imported.
pub fn prompt_import_password() -> Result<Zeroizing<String>> {
    password_from_env_or_prompt(IMPORT_PASSWORD_ENV, "Enter passphrase of the imported vault")
}

fn password_from_env_or_prompt(var: &str, prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(var) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used during `init`).
///
/// Also respects `LOCALVAULT_PASSWORD` for scripted usage; length is
/// enforced by `VaultSession::setup` in that case.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master passphrase")
            .with_confirmation(
                "Confirm master passphrase",
                "Passphrases do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < MIN_PASSPHRASE_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Read a secret value from piped stdin, or prompt for it.
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        return read_piped_secret(io::stdin().lock());
    }

    let secret = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Initial buffer size for piped secrets; longer input grows it.
const SECRET_BUF_LEN: usize = 1024;

/// Read a secret from `reader` up to EOF, dropping trailing newlines.
///
/// The buffer is grown by hand so every superseded allocation is
/// zeroized on drop rather than freed with secret bytes in it.
fn read_piped_secret(mut reader: impl Read) -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(Vec::with_capacity(SECRET_BUF_LEN));
    let mut chunk = Zeroizing::new([0u8; 256]);

    loop {
        let n = match reader.read(&mut chunk[..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if buf.len() + n > buf.capacity() {
            let mut grown = Zeroizing::new(Vec::with_capacity((buf.len() + n) * 2));
            grown.extend_from_slice(&buf);
            buf = grown;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    while matches!(buf.last(), Some(b'\r' | b'\n')) {
        buf.pop();
    }

    String::from_utf8(std::mem::take(&mut *buf))
        .map(Zeroizing::new)
        .map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::InvalidInput("secret is not valid UTF-8".into())
        })
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

use thiserror::Error;

/// All errors that can occur in LocalVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong key, tampered ciphertext and tampered associated data all
    /// collapse into this one variant.
    #[error("Decryption failed: wrong key or corrupted data")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KdfFailure(String),

    // --- Session errors ---
    #[error("Passphrase must be at least {0} characters")]
    WeakPassphrase(usize),

    #[error("Vault is locked, unlock it first")]
    UnlockRequired,

    #[error("Wrong passphrase")]
    WrongPassphrase,

    #[error("A master passphrase is already set up for this vault")]
    AlreadyInitialized,

    #[error("No master passphrase set up yet (run `localvault init`)")]
    MasterNotSet,

    // --- Record errors ---
    #[error("Invalid vault file: {0}")]
    InvalidFile(String),

    #[error("Entry '{0}' not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for LocalVault results.
pub type Result<T> = std::result::Result<T, VaultError>;

//! Configuration loaded from `.localvault.toml`.

pub mod settings;

pub use settings::Settings;

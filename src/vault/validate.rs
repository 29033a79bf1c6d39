//! Structural validation of untrusted vault files (import sources).
//!
//! Parsing never returns a half-checked record: the result is either
//! `ParsedVault::Valid` with every field well-typed, or
//! `ParsedVault::Invalid` with a human-readable reason.

use serde_json::Value;

use super::record::{VaultRecord, CURRENT_VERSION};
use crate::crypto::cipher::{NONCE_LEN, TAG_LEN};

/// Outcome of parsing an untrusted vault file.
#[derive(Debug)]
pub enum ParsedVault {
    Valid(VaultRecord),
    Invalid(String),
}

impl ParsedVault {
    /// Parse and validate raw bytes.
    ///
    /// Unlike `RecordStore::load`, a missing `version` is rejected here:
    /// a foreign file has to say what it is.
    pub fn parse(bytes: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(bytes) {
            Ok(v) => v,
            Err(e) => return Self::Invalid(format!("not a JSON document: {e}")),
        };

        let Some(object) = value.as_object() else {
            return Self::Invalid("top level is not an object".into());
        };
        match object.get("version").or_else(|| object.get("formatVersion")) {
            Some(Value::String(v)) if v == CURRENT_VERSION => {}
            Some(other) => return Self::Invalid(format!("unsupported version {other}")),
            None => return Self::Invalid("missing version".into()),
        }

        let record: VaultRecord = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => return Self::Invalid(format!("malformed record: {e}")),
        };

        Self::check(record)
    }

    /// Checks serde cannot express through types alone.
    fn check(record: VaultRecord) -> Self {
        let Some(master) = &record.master else {
            return Self::Invalid("no master credential".into());
        };
        let p = &master.params;
        if p.cost_factor == 0
            || p.block_size == 0
            || p.parallelism == 0
            || p.key_length == 0
            || p.memory_limit == 0
        {
            return Self::Invalid("scrypt parameters must be positive".into());
        }
        if master.salt.is_empty() || master.hash.is_empty() {
            return Self::Invalid("empty salt or hash".into());
        }

        for (index, entry) in record.entries.iter().enumerate() {
            let envelope = &entry.envelope;
            if envelope.nonce.len() != NONCE_LEN {
                return Self::Invalid(format!("entry {index}: nonce must be {NONCE_LEN} bytes"));
            }
            if envelope.tag.len() != TAG_LEN {
                return Self::Invalid(format!("entry {index}: tag must be {TAG_LEN} bytes"));
            }
        }

        Self::Valid(record)
    }
}

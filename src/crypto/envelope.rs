//! The `SecretEnvelope` stored in place of a plaintext secret.
//!
//! Binary fields are serialized as base64 strings so vault files stay
//! human-diffable.  The on-disk names (`version`, `iv`, `aad`) are the
//! canonical ones; the descriptive names (`formatVersion`, `nonce`,
//! `associatedData`) are accepted as aliases when reading.

use serde::{Deserialize, Serialize};

/// Envelope format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeVersion {
    #[serde(rename = "enc-v1")]
    EncV1,
}

/// AEAD algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherAlgorithm {
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

/// The output of one AEAD encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretEnvelope {
    #[serde(rename = "version", alias = "formatVersion")]
    pub format_version: EnvelopeVersion,

    pub algorithm: CipherAlgorithm,

    /// 96-bit nonce, fresh for every encryption.
    #[serde(
        rename = "iv",
        alias = "nonce",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub nonce: Vec<u8>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,

    /// 128-bit authentication tag.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub tag: Vec<u8>,

    /// Always the owning entry's id at the time of the last encryption.
    #[serde(rename = "aad", alias = "associatedData")]
    pub associated_data: String,
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

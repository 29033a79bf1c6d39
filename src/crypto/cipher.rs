//! AES-256-GCM authenticated encryption of a single secret.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! binds the caller's associated data (the entry id) into the 16-byte
//! tag.  The tag is stored separately from the ciphertext in the
//! returned `SecretEnvelope`.

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use super::envelope::{CipherAlgorithm, EnvelopeVersion, SecretEnvelope};
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under a 32-byte `key`, binding `associated_data`.
pub fn encrypt(key: &[u8], plaintext: &str, associated_data: &str) -> Result<SecretEnvelope> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let payload = Payload {
        msg: plaintext.as_bytes(),
        aad: associated_data.as_bytes(),
    };
    let mut sealed = cipher
        .encrypt(&nonce, payload)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    // aes-gcm appends the tag; split it off into its own field.
    let tag = sealed.split_off(sealed.len() - TAG_LEN);

    Ok(SecretEnvelope {
        format_version: EnvelopeVersion::EncV1,
        algorithm: CipherAlgorithm::Aes256Gcm,
        nonce: nonce.to_vec(),
        ciphertext: sealed,
        tag,
        associated_data: associated_data.to_string(),
    })
}

/// Decrypt an envelope produced by `encrypt`.
///
/// `expected_aad` is the id of the entry the envelope is stored under.
/// The stored `aad` must match it and the tag is verified against it,
/// so an envelope copied onto another entry does not decrypt.
///
/// Every failure (wrong key, tampered bytes, tampered or foreign
/// associated data, malformed lengths, non-UTF-8 output) returns
/// `VaultError::AuthenticationFailed` and no partial plaintext.
pub fn decrypt(
    key: &[u8],
    envelope: &SecretEnvelope,
    expected_aad: &str,
) -> Result<Zeroizing<String>> {
    if envelope.nonce.len() != NONCE_LEN || envelope.tag.len() != TAG_LEN {
        return Err(VaultError::AuthenticationFailed);
    }
    if !bool::from(envelope.associated_data.as_bytes().ct_eq(expected_aad.as_bytes())) {
        return Err(VaultError::AuthenticationFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::AuthenticationFailed)?;
    let nonce = Nonce::from_slice(&envelope.nonce);

    let mut sealed = Vec::with_capacity(envelope.ciphertext.len() + TAG_LEN);
    sealed.extend_from_slice(&envelope.ciphertext);
    sealed.extend_from_slice(&envelope.tag);

    let payload = Payload {
        msg: &sealed,
        aad: expected_aad.as_bytes(),
    };
    let plaintext = cipher
        .decrypt(nonce, payload)
        .map_err(|_| VaultError::AuthenticationFailed)?;

    String::from_utf8(plaintext)
        .map(Zeroizing::new)
        .map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::AuthenticationFailed
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];

    #[test]
    fn envelope_carries_expected_shape() {
        let envelope = encrypt(&KEY, "hunter2", "entry-1").unwrap();
        assert_eq!(envelope.nonce.len(), NONCE_LEN);
        assert_eq!(envelope.tag.len(), TAG_LEN);
        assert_eq!(envelope.ciphertext.len(), "hunter2".len());
        assert_eq!(envelope.associated_data, "entry-1");
        assert_ne!(envelope.ciphertext, b"hunter2");
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let envelope = encrypt(&KEY, "", "id").unwrap();
        assert_eq!(decrypt(&KEY, &envelope, "id").unwrap().as_str(), "");
    }

    #[test]
    fn short_key_is_rejected() {
        assert!(matches!(
            encrypt(&[0u8; 16], "x", "id"),
            Err(VaultError::EncryptionFailed(_))
        ));
    }

    #[test]
    fn truncated_tag_fails_closed() {
        let mut envelope = encrypt(&KEY, "secret", "id").unwrap();
        envelope.tag.pop();
        assert!(matches!(
            decrypt(&KEY, &envelope, "id"),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn envelope_only_opens_under_its_own_id() {
        let envelope = encrypt(&KEY, "secret", "entry-a").unwrap();
        assert_eq!(decrypt(&KEY, &envelope, "entry-a").unwrap().as_str(), "secret");
        assert!(matches!(
            decrypt(&KEY, &envelope, "entry-b"),
            Err(VaultError::AuthenticationFailed)
        ));
    }
}

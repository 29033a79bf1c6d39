//! The in-memory vault key.

use zeroize::Zeroizing;

/// The unlocked vault key.  Its bytes are zeroed when dropped, so
/// discarding the `MasterKey` (e.g. on lock) wipes it from memory.
pub struct MasterKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl MasterKey {
    /// Wrap raw key bytes, typically the output of `derive_key`.
    pub fn new(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the entry cipher).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

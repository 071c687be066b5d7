//! Row-version tokens for optimistic concurrency.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque concurrency token attached to every stored device.
///
/// The store assigns a new token on every committed write. Callers must send
/// back the token they last read; a write carrying any other token is rejected
/// as a conflict. The content is meaningful to the store only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowVersion(Vec<u8>);

impl RowVersion {
    /// Wrap raw token bytes, as received from a caller.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Encode a store-side counter as an 8-byte big-endian token.
    #[must_use]
    pub fn from_counter(counter: i64) -> Self {
        Self(counter.to_be_bytes().to_vec())
    }

    /// Decode a token produced by [`RowVersion::from_counter`].
    ///
    /// Returns `None` when the token is not 8 bytes long, in which case it
    /// cannot match any stored version.
    #[must_use]
    pub fn as_counter(&self) -> Option<i64> {
        let bytes: [u8; 8] = self.0.as_slice().try_into().ok()?;
        Some(i64::from_be_bytes(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `true` for a device that was never persisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RowVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

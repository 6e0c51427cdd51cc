//! Content-addressed evidence identity.

use crate::CoreError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The lowercase hex SHA-256 of an evidence file's original bytes.
///
/// This is the sole primary key for raw evidence and is used verbatim as
/// the `sha256=<id>` directory component in the evidence store (see
/// `evidentia-store`). Truncating it for display is allowed; truncating it
/// for use as a key is not, so this type deliberately offers no lossy
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EvidenceId(String);

impl EvidenceId {
    /// Computes the id from the full contents of a file.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        Self(hex_encode(&digest))
    }

    /// Parses an id from an already-lowercased 64-character hex string,
    /// as read back from a directory name or a persisted record.
    pub fn from_hex(hex: impl Into<String>) -> Result<Self, CoreError> {
        let hex = hex.into();
        if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidEvidenceId(hex));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// The full lowercase hex representation — the only form that may be
    /// used as a key or directory component.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// The `sha256=<id>` directory component for the evidence store layout.
    pub fn store_component(&self) -> String {
        format!("sha256={}", self.0)
    }

    /// A display-only truncated form. Never use this as a key.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EvidenceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

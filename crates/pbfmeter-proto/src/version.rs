//! Protocol version eras.
//!
//! A connection negotiates one version during the handshake and keeps it for
//! its whole life. The version decides how ambiguous message codes are read:
//!
//! | Version  | `0x04`         | `0x06`        | `0x0e`, `0x10`       |
//! |----------|----------------|---------------|----------------------|
//! | `pbf/61` | BlockHashes    | Blocks        | undefined            |
//! | `pbf/62` | BlockHeaders   | BlockBodies   | undefined            |
//! | `pbf/63` | BlockHeaders   | BlockBodies   | NodeData, Receipts   |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, Result};

/// Negotiated wire-format era of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolVersion(u32);

impl ProtocolVersion {
    /// Hash-chain sync era
    pub const PBF61: Self = Self(61);
    /// Header-first sync era
    pub const PBF62: Self = Self(62);
    /// Fast-sync era (state and receipt retrieval)
    pub const PBF63: Self = Self(63);

    /// Versions this node speaks, most preferred first.
    pub const SUPPORTED: [Self; 3] = [Self::PBF63, Self::PBF62, Self::PBF61];

    /// Wrap a raw version number without checking it.
    ///
    /// Classification accepts any version, so unknown values are legal here;
    /// use [`ProtocolVersion::supported`] where only spoken versions are valid.
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Raw version number.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this node speaks the version.
    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }

    /// Validate a raw version number against [`ProtocolVersion::SUPPORTED`].
    pub fn supported(version: u32) -> Result<Self> {
        let version = Self(version);
        if version.is_supported() {
            Ok(version)
        } else {
            Err(ProtocolError::UnsupportedVersion(version.0))
        }
    }

    /// Number of message codes the version defines (`0..count`).
    ///
    /// Returns `None` for versions this node does not speak.
    pub const fn message_count(self) -> Option<u64> {
        match self.0 {
            61 => Some(9),
            62 => Some(8),
            63 => Some(17),
            _ => None,
        }
    }

    /// Pick the highest version both sides speak.
    pub fn negotiate(remote: &[u32]) -> Result<Self> {
        Self::SUPPORTED.into_iter().find(|local| remote.contains(&local.0)).ok_or_else(|| {
            ProtocolError::NoCommonVersion { local: Self::SUPPORTED[0], remote: remote.to_vec() }
        })
    }
}

impl From<u32> for ProtocolVersion {
    fn from(version: u32) -> Self {
        Self(version)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pbf/{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eras_are_ordered() {
        assert!(ProtocolVersion::PBF61 < ProtocolVersion::PBF62);
        assert!(ProtocolVersion::PBF62 < ProtocolVersion::PBF63);
    }

    #[test]
    fn negotiate_prefers_newest_common() {
        assert_eq!(ProtocolVersion::negotiate(&[61, 62]), Ok(ProtocolVersion::PBF62));
        assert_eq!(ProtocolVersion::negotiate(&[63, 61, 99]), Ok(ProtocolVersion::PBF63));
    }

    #[test]
    fn negotiate_without_overlap_fails() {
        let err = ProtocolVersion::negotiate(&[60, 64]).unwrap_err();
        assert!(matches!(err, ProtocolError::NoCommonVersion { .. }));
    }

    #[test]
    fn supported_rejects_unknown() {
        assert_eq!(ProtocolVersion::supported(63), Ok(ProtocolVersion::PBF63));
        assert_eq!(ProtocolVersion::supported(1), Err(ProtocolError::UnsupportedVersion(1)));
    }

    #[test]
    fn message_counts_per_era() {
        assert_eq!(ProtocolVersion::PBF61.message_count(), Some(9));
        assert_eq!(ProtocolVersion::PBF62.message_count(), Some(8));
        assert_eq!(ProtocolVersion::PBF63.message_count(), Some(17));
        assert_eq!(ProtocolVersion::new(7).message_count(), None);
    }

    #[test]
    fn display_uses_protocol_prefix() {
        assert_eq!(ProtocolVersion::PBF62.to_string(), "pbf/62");
    }
}

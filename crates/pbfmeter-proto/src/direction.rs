//! Traffic direction relative to the local node.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a message was received from, or sent to, a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Read from the peer
    Inbound,
    /// Written to the peer
    Outbound,
}

impl Direction {
    /// Both directions, inbound first.
    pub const ALL: [Self; 2] = [Self::Inbound, Self::Outbound];

    /// Short label used in meter names (`in` / `out`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inbound => "in",
            Self::Outbound => "out",
        }
    }

    /// Dense index, `0` for inbound and `1` for outbound.
    pub const fn index(self) -> usize {
        match self {
            Self::Inbound => 0,
            Self::Outbound => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

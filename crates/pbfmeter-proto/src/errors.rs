//! Error types for protocol vocabulary checks.

use thiserror::Error;

use crate::ProtocolVersion;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while validating protocol-level values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Version is not one this node speaks
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u32),

    /// The two peers share no protocol version
    #[error("no common protocol version (local max {local}, remote offered {remote:?})")]
    NoCommonVersion {
        /// Highest version the local node supports
        local: ProtocolVersion,
        /// Versions the remote peer offered
        remote: Vec<u32>,
    },

    /// Message code outside the range the negotiated version defines
    #[error("message code {code:#04x} out of range for {version} (max {max:#04x})")]
    CodeOutOfRange {
        /// Offending code
        code: u64,
        /// Version in force on the connection
        version: ProtocolVersion,
        /// Highest valid code for that version
        max: u64,
    },
}

//! Metering error types.
//!
//! Reading and writing through a metered channel never produces these; the
//! inner channel's own error type is returned untouched. They only cover
//! lifecycle misuse and operator lookups.

use pbfmeter_proto::ProtocolVersion;
use thiserror::Error;

/// Errors from metering lifecycle operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeteringError {
    /// `bind_version` called on a stream that already has a version
    #[error("protocol version already bound to {bound}, refusing {requested}")]
    VersionAlreadyBound {
        /// Version bound first
        bound: ProtocolVersion,
        /// Version the second call tried to bind
        requested: ProtocolVersion,
    },

    /// No meter is registered under this name
    #[error("unknown meter: {0}")]
    UnknownMeter(String),
}

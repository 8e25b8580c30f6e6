//! Wire vocabulary for the pbf peer protocol.
//!
//! Peers exchange discrete messages, each carrying a numeric code, the
//! wire-encoded size and an opaque payload. The meaning of a code depends on
//! the protocol version negotiated during the handshake: several codes were
//! reassigned when the protocol moved from `pbf/61` to `pbf/62`, and `pbf/63`
//! added state and receipt retrieval on top.
//!
//! This crate only names things. It does not encode or decode payloads.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codes;
pub mod direction;
pub mod errors;
pub mod message;
pub mod version;

pub use direction::Direction;
pub use errors::{ProtocolError, Result};
pub use message::Message;
pub use version::ProtocolVersion;

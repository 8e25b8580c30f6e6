//! Protocol message as seen by the channel layer.

use bytes::Bytes;

/// A single protocol message.
///
/// `size` is the wire-encoded length reported by the transport. It is kept
/// separate from `payload` because the transport may have framed, compressed
/// or not yet read the payload; accounting always uses `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message code, interpreted against the connection's protocol version
    pub code: u64,
    /// Wire-encoded length in bytes
    pub size: u32,
    /// Opaque payload
    pub payload: Bytes,
}

impl Message {
    /// Build a message whose wire size is the payload length.
    ///
    /// Payloads longer than `u32::MAX` saturate the size; the transport
    /// refuses such messages long before they reach a channel.
    pub fn new(code: u64, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let size = u32::try_from(payload.len()).unwrap_or(u32::MAX);
        Self { code, size, payload }
    }

    /// Build a message with an explicit wire size.
    pub fn with_size(code: u64, size: u32, payload: impl Into<Bytes>) -> Self {
        Self { code, size, payload: payload.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_defaults_to_payload_length() {
        let msg = Message::new(0x02, vec![0u8; 37]);
        assert_eq!(msg.size, 37);
        assert_eq!(msg.payload.len(), 37);
    }

    #[test]
    fn explicit_size_is_kept() {
        let msg = Message::with_size(0x07, 1024, Bytes::new());
        assert_eq!(msg.size, 1024);
        assert!(msg.payload.is_empty());
    }
}

//! Message channel abstraction.
//!
//! Abstracts over the per-peer message stream the transport hands to the
//! protocol handler once a connection is up. Production wraps the encrypted
//! peer session; tests use in-memory channels from `pbfmeter-harness`.

use std::future::Future;

use pbfmeter_proto::Message;

/// Bidirectional stream of discrete, length-known messages with one peer.
///
/// Methods take `&self` so a single channel can be shared (behind an `Arc`)
/// by one reader task and one writer task. Implementations decide how the two
/// halves are synchronised internally.
///
/// Errors are the implementation's own type. Decorators such as
/// [`crate::MeteredMessageStream`] reuse it unchanged, so a caller matching on
/// transport errors sees exactly what the transport produced.
///
/// The futures are returned unboxed, so a decorator adds no allocation per
/// message on top of what the transport itself does.
pub trait MessageChannel: Send + Sync + 'static {
    /// Transport failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Receive the next message.
    ///
    /// Blocks until a message arrives or the channel fails.
    fn read_message(&self) -> impl Future<Output = Result<Message, Self::Error>> + Send;

    /// Send a message.
    ///
    /// Returns once the transport has accepted the message; delivery to the
    /// peer is not confirmed.
    fn write_message(
        &self,
        message: Message,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

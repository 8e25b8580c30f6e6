//! Metering decorator for message channels.
//!
//! [`MeteredMessageStream`] owns the inner channel and forwards every call to
//! it, counting each message against the shared [`MeterRegistry`] on the way.
//! [`Metered`] is what [`crate::Metering::wrap`] hands out: either the stream,
//! or the untouched inner channel when metering is disabled.
//!
//! # Lifecycle
//!
//! 1. Wrap the channel as soon as the transport produces it.
//! 2. Run the handshake through it; until a version is bound, messages are
//!    classified as `pbf/0`, which only matches version-independent rules and
//!    the legacy-era rules.
//! 3. Call `bind_version` once with the negotiated version. It takes
//!    `&mut self`, so it necessarily happens before the stream is shared with
//!    the reader and writer tasks.
//! 4. Drop the stream (or `into_inner`) when the connection closes.
//!
//! Neither type boxes a future: the passthrough arm awaits the inner channel
//! directly, and a metered write hands back the inner channel's own future
//! after accounting.

use std::{future::Future, sync::Arc};

use pbfmeter_proto::{Direction, Message, ProtocolVersion};

use crate::{MessageChannel, MeterRegistry, MeteringError, classify};

/// Version assumed before `bind_version` runs.
pub const UNBOUND_VERSION: ProtocolVersion = ProtocolVersion::new(0);

/// A message channel that meters everything passing through it.
#[derive(Debug)]
pub struct MeteredMessageStream<C> {
    inner: C,
    registry: Arc<MeterRegistry>,
    version: Option<ProtocolVersion>,
}

impl<C> MeteredMessageStream<C> {
    /// Wrap `inner`, accounting against `registry`.
    pub fn new(inner: C, registry: Arc<MeterRegistry>) -> Self {
        Self { inner, registry, version: None }
    }

    /// Fix the protocol version used to classify this connection's traffic.
    ///
    /// # Errors
    ///
    /// `VersionAlreadyBound` if a version was bound before; the first binding
    /// stays in force.
    pub fn bind_version(&mut self, version: ProtocolVersion) -> Result<(), MeteringError> {
        if let Some(bound) = self.version {
            tracing::warn!(%bound, requested = %version, "refusing to rebind stream version");
            return Err(MeteringError::VersionAlreadyBound { bound, requested: version });
        }

        tracing::debug!(%version, "metered stream version bound");
        self.version = Some(version);
        Ok(())
    }

    /// Bound version, if any.
    pub fn version(&self) -> Option<ProtocolVersion> {
        self.version
    }

    /// Registry this stream reports to.
    pub fn registry(&self) -> &Arc<MeterRegistry> {
        &self.registry
    }

    /// The wrapped channel.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Unwrap, returning the inner channel.
    pub fn into_inner(self) -> C {
        self.inner
    }

    #[inline]
    fn account(&self, message: &Message, direction: Direction) {
        let version = self.version.unwrap_or(UNBOUND_VERSION);
        let key = classify(version, message.code, direction);
        self.registry.increment(self.registry.get(key), 1, u64::from(message.size));
    }
}

impl<C: MessageChannel> MessageChannel for MeteredMessageStream<C> {
    type Error = C::Error;

    async fn read_message(&self) -> Result<Message, Self::Error> {
        let message = self.inner.read_message().await?;
        self.account(&message, Direction::Inbound);
        Ok(message)
    }

    /// Meters before forwarding: a send that the transport then rejects is
    /// still counted. Outbound meters track attempted sends, not delivery.
    fn write_message(
        &self,
        message: Message,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.account(&message, Direction::Outbound);
        self.inner.write_message(message)
    }
}

/// A channel as handed out by [`crate::Metering::wrap`].
#[derive(Debug)]
pub enum Metered<C> {
    /// Metering disabled: the inner channel itself, never touched by a meter
    Passthrough(C),
    /// Metering enabled
    Stream(MeteredMessageStream<C>),
}

impl<C> Metered<C> {
    /// Bind the negotiated protocol version. No-op on a passthrough.
    pub fn bind_version(&mut self, version: ProtocolVersion) -> Result<(), MeteringError> {
        match self {
            Self::Passthrough(_) => Ok(()),
            Self::Stream(stream) => stream.bind_version(version),
        }
    }

    /// Whether traffic through this channel is metered.
    pub fn is_metered(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Unwrap, returning the inner channel.
    pub fn into_inner(self) -> C {
        match self {
            Self::Passthrough(inner) => inner,
            Self::Stream(stream) => stream.into_inner(),
        }
    }
}

impl<C: MessageChannel> MessageChannel for Metered<C> {
    type Error = C::Error;

    async fn read_message(&self) -> Result<Message, Self::Error> {
        match self {
            Self::Passthrough(inner) => inner.read_message().await,
            Self::Stream(stream) => stream.read_message().await,
        }
    }

    async fn write_message(&self, message: Message) -> Result<(), Self::Error> {
        match self {
            Self::Passthrough(inner) => inner.write_message(message).await,
            Self::Stream(stream) => stream.write_message(message).await,
        }
    }
}

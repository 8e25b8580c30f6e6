//! Simulated peer sessions.
//!
//! A session runs the status handshake over the freshly wrapped channel,
//! binds the negotiated version, then hands the channel to one reader and one
//! writer task. The remote side is an unmetered in-memory peer.

use std::sync::Arc;

use pbfmeter_core::{MessageChannel, MeterSnapshot, Metered};
use pbfmeter_harness::TrafficGenerator;
use pbfmeter_proto::{Message, ProtocolVersion, codes};

use crate::NodeError;

/// Traffic one side moved, as the metering layer should have seen it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Moved {
    /// Messages and bytes received
    pub inbound: MeterSnapshot,
    /// Messages and bytes sent (attempted)
    pub outbound: MeterSnapshot,
}

impl std::ops::Add for Moved {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { inbound: self.inbound + rhs.inbound, outbound: self.outbound + rhs.outbound }
    }
}

fn one(message: &Message) -> MeterSnapshot {
    MeterSnapshot { count: 1, bytes: u64::from(message.size) }
}

/// Build a status message offering `versions`.
pub fn status_message(versions: &[u32]) -> Message {
    let payload: Vec<u8> = versions.iter().flat_map(|v| v.to_be_bytes()).collect();
    Message::new(codes::STATUS, payload)
}

/// Versions offered by a status message.
pub fn parse_status(peer: usize, message: &Message) -> Result<Vec<u32>, NodeError> {
    if message.code != codes::STATUS {
        return Err(NodeError::Handshake {
            peer,
            reason: format!("expected status, got code {:#04x}", message.code),
        });
    }
    let chunks = message.payload.chunks_exact(4);
    if !chunks.remainder().is_empty() {
        return Err(NodeError::Handshake {
            peer,
            reason: format!("status payload of {} bytes", message.payload.len()),
        });
    }
    Ok(chunks.map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]])).collect())
}

/// Local side of the handshake.
///
/// Offers every supported version, reads the peer's choice and binds it on
/// the metered channel. Both status messages are metered under the unbound
/// version.
pub async fn handshake<C: MessageChannel>(
    peer: usize,
    channel: &mut Metered<C>,
) -> Result<(ProtocolVersion, Moved), NodeError> {
    let offer: Vec<u32> = ProtocolVersion::SUPPORTED.iter().map(|v| v.get()).collect();
    let hello = status_message(&offer);
    let mut moved = Moved { outbound: one(&hello), ..Moved::default() };
    channel.write_message(hello).await.map_err(NodeError::channel(peer))?;

    let reply = channel.read_message().await.map_err(NodeError::channel(peer))?;
    moved.inbound = one(&reply);
    let chosen = ProtocolVersion::negotiate(&parse_status(peer, &reply)?)?;

    channel.bind_version(chosen)?;
    tracing::debug!(peer, version = %chosen, "handshake complete");
    Ok((chosen, moved))
}

/// Remote side of the handshake: pick the newest version in `accept` that
/// the local node offered.
pub async fn answer_handshake<C: MessageChannel>(
    peer: usize,
    channel: &C,
    accept: &[u32],
) -> Result<ProtocolVersion, NodeError> {
    let hello = channel.read_message().await.map_err(NodeError::channel(peer))?;
    let offered = parse_status(peer, &hello)?;
    let common: Vec<u32> = accept.iter().copied().filter(|v| offered.contains(v)).collect();
    let chosen = ProtocolVersion::negotiate(&common)?;

    channel
        .write_message(status_message(&[chosen.get()]))
        .await
        .map_err(NodeError::channel(peer))?;
    Ok(chosen)
}

/// Send `count` generated messages.
pub async fn send_traffic<C: MessageChannel>(
    peer: usize,
    channel: Arc<C>,
    mut traffic: TrafficGenerator,
    count: u64,
) -> Result<MeterSnapshot, NodeError> {
    let mut sent = MeterSnapshot::default();
    for _ in 0..count {
        let message = traffic.next_message();
        sent = sent + one(&message);
        channel.write_message(message).await.map_err(NodeError::channel(peer))?;
    }
    Ok(sent)
}

/// Receive `count` messages.
pub async fn drain_traffic<C: MessageChannel>(
    peer: usize,
    channel: Arc<C>,
    count: u64,
) -> Result<MeterSnapshot, NodeError> {
    let mut received = MeterSnapshot::default();
    for _ in 0..count {
        let message = channel.read_message().await.map_err(NodeError::channel(peer))?;
        received = received + one(&message);
    }
    Ok(received)
}

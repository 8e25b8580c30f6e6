//! Connected pair of in-memory channels.

use pbfmeter_core::MessageChannel;
use pbfmeter_proto::Message;
use tokio::sync::{Mutex, mpsc};

use crate::ChannelError;

/// One end of an in-memory duplex link.
///
/// Writes never block. Reads wait for the peer to write and fail with
/// [`ChannelError::Closed`] once the peer is dropped and the queue drained.
#[derive(Debug)]
pub struct MemoryChannel {
    tx: mpsc::UnboundedSender<Message>,
    rx: Mutex<mpsc::UnboundedReceiver<Message>>,
}

impl MemoryChannel {
    /// Create two connected ends.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (Self { tx: a_tx, rx: Mutex::new(a_rx) }, Self { tx: b_tx, rx: Mutex::new(b_rx) })
    }
}

impl MessageChannel for MemoryChannel {
    type Error = ChannelError;

    async fn read_message(&self) -> Result<Message, ChannelError> {
        self.rx.lock().await.recv().await.ok_or(ChannelError::Closed)
    }

    async fn write_message(&self, message: Message) -> Result<(), ChannelError> {
        self.tx.send(message).map_err(|_| ChannelError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn messages_cross_the_pair() {
        let (a, b) = MemoryChannel::pair();
        a.write_message(Message::new(0x02, vec![7u8; 3])).await.unwrap();
        b.write_message(Message::new(0x07, Vec::new())).await.unwrap();

        assert_eq!(b.read_message().await.unwrap().code, 0x02);
        assert_eq!(a.read_message().await.unwrap().code, 0x07);
    }

    #[tokio::test]
    async fn dropped_peer_closes() {
        let (a, b) = MemoryChannel::pair();
        drop(b);
        assert_eq!(a.read_message().await, Err(ChannelError::Closed));
        assert_eq!(a.write_message(Message::new(0, Vec::new())).await, Err(ChannelError::Closed));
    }
}

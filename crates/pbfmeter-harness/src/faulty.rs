//! Fault-injecting channel wrapper.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use pbfmeter_core::MessageChannel;
use pbfmeter_proto::Message;

use crate::ChannelError;

/// Wraps a channel and fails reads or writes on demand.
///
/// Failed writes never reach the inner channel. Counters record how many
/// operations actually reached it, which lets tests tell attempted traffic
/// from delivered traffic.
#[derive(Debug)]
pub struct FaultyChannel<C> {
    inner: C,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl<C> FaultyChannel<C> {
    /// Wrap `inner` with no faults armed.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Make every subsequent read fail (or stop failing).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or stop failing).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reads that reached the inner channel and succeeded.
    pub fn delivered_reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Writes that reached the inner channel and succeeded.
    pub fn delivered_writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl<C> MessageChannel for FaultyChannel<C>
where
    C: MessageChannel<Error = ChannelError>,
{
    type Error = ChannelError;

    async fn read_message(&self) -> Result<Message, ChannelError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            tracing::trace!("injecting read fault");
            return Err(ChannelError::Injected("read".to_string()));
        }
        let message = self.inner.read_message().await?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(message)
    }

    async fn write_message(&self, message: Message) -> Result<(), ChannelError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            tracing::trace!(code = message.code, "injecting write fault");
            return Err(ChannelError::Injected("write".to_string()));
        }
        self.inner.write_message(message).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

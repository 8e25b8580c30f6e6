//! Deterministic test harness for pbfmeter.
//!
//! In-memory [`MessageChannel`](pbfmeter_core::MessageChannel)
//! implementations and a seeded traffic generator, so metering can be
//! exercised end to end without sockets.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod faulty;
pub mod memory;
pub mod traffic;

pub use error::ChannelError;
pub use faulty::FaultyChannel;
pub use memory::MemoryChannel;
pub use traffic::TrafficGenerator;

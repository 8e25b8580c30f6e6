//! Traffic metering for pbf peer message channels.
//!
//! Every message a node exchanges with a peer is classified by the
//! connection's protocol version and the message code, then counted (events
//! and bytes) against a fixed set of per-category meters. The metering layer
//! sits between the transport and the protocol handler as a decorator around
//! a [`MessageChannel`] and never changes what flows through it.
//!
//! # Architecture
//!
//! ```text
//!   transport ──► MeteredMessageStream ──► protocol handler
//!                   │        ▲
//!          classify │        │ bind_version (once, after handshake)
//!                   ▼
//!              MeterRegistry (shared, lock-free)
//! ```
//!
//! # Components
//!
//! - [`meter`]: Atomic counter pair (events, bytes)
//! - [`category`]: Accounting buckets and meter keys
//! - [`classify`]: Version-aware message classifier
//! - [`registry`]: Fixed set of meters built once at startup
//! - [`channel`]: Message channel abstraction
//! - [`metered`]: Metering decorator for channels
//! - [`metering`]: Factory that honours the enabled flag
//! - [`config`]: Metering configuration
//! - [`error`]: Metering error types

pub mod category;
pub mod channel;
pub mod classify;
pub mod config;
pub mod error;
pub mod meter;
pub mod metered;
pub mod metering;
pub mod registry;

pub use category::{Category, MeterKey};
pub use channel::MessageChannel;
pub use classify::classify;
pub use config::MeteringConfig;
pub use error::MeteringError;
pub use meter::{Meter, MeterSnapshot};
pub use metered::{Metered, MeteredMessageStream};
pub use metering::Metering;
pub use registry::{MeterHandle, MeterReading, MeterRegistry};

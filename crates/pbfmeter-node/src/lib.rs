//! Simulated pbf node.
//!
//! Wires the metering layer the way a real node does: one registry at
//! startup, every peer channel wrapped when the transport hands it over, the
//! version bound after the status handshake, then concurrent reader and
//! writer tasks per peer. Peers are in-memory, so a run is deterministic for
//! a given seed.
//!
//! # Components
//!
//! - [`cli`]: Command-line arguments
//! - [`logging`]: Log sink bootstrap
//! - [`peer`]: Handshake and traffic tasks
//! - [`node`]: Run orchestration and reporting
//! - [`error`]: Node error types

pub mod cli;
pub mod error;
pub mod logging;
pub mod node;
pub mod peer;

pub use cli::Args;
pub use error::NodeError;
pub use logging::LogSink;
pub use node::{NodeConfig, RunReport, run};

//! Node error types.

use std::{io, path::PathBuf};

use pbfmeter_core::MeteringError;
use pbfmeter_proto::ProtocolError;
use thiserror::Error;

/// Errors that stop the node
#[derive(Error, Debug)]
pub enum NodeError {
    /// Log file could not be opened
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        /// Resolved log file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A global tracing subscriber is already installed
    #[error("logging already initialised: {0}")]
    Logging(String),

    /// Peer channel failed
    #[error("peer {peer}: channel error: {source}")]
    Channel {
        /// Peer index
        peer: usize,
        /// Transport error as produced by the channel
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Handshake produced something other than a valid status
    #[error("peer {peer}: bad handshake: {reason}")]
    Handshake {
        /// Peer index
        peer: usize,
        /// What was wrong
        reason: String,
    },

    /// Version negotiation failed
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Metering lifecycle misuse
    #[error(transparent)]
    Metering(#[from] MeteringError),

    /// A peer task panicked or was cancelled
    #[error("peer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Meter report could not be written
    #[error("cannot write report {path}: {source}")]
    Report {
        /// Report path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Meter report could not be serialised
    #[error("cannot serialise report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl NodeError {
    /// Wrap a channel error from peer `peer`.
    pub fn channel<E>(peer: usize) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| Self::Channel { peer, source: Box::new(source) }
    }
}

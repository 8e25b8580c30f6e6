//! Channel errors produced by the harness.

use thiserror::Error;

/// Failure of an in-memory channel.
///
/// Comparable by value so tests can assert that a decorator returned exactly
/// the error the inner channel produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The other end was dropped
    #[error("channel closed")]
    Closed,

    /// Failure injected by a [`crate::FaultyChannel`]
    #[error("injected fault: {0}")]
    Injected(String),
}

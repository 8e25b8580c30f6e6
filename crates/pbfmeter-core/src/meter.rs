//! Atomic counter pair.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Event count and byte volume for one accounting bucket.
///
/// Both counters only ever grow, by atomic addition. Readers see an
/// eventually consistent view: `count` and `bytes` are loaded independently,
/// so a snapshot taken mid-update may include one side of an increment but
/// not the other.
#[derive(Debug)]
pub struct Meter {
    name: String,
    count: AtomicU64,
    bytes: AtomicU64,
}

/// Point-in-time reading of a [`Meter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeterSnapshot {
    /// Events recorded
    pub count: u64,
    /// Bytes recorded
    pub bytes: u64,
}

impl Meter {
    /// Create a zeroed meter.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), count: AtomicU64::new(0), bytes: AtomicU64::new(0) }
    }

    /// Meter name, without the `/packets` or `/traffic` suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record `events` events totalling `bytes` bytes. Wraps on overflow.
    #[inline]
    pub fn mark(&self, events: u64, bytes: u64) {
        self.count.fetch_add(events, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Events recorded so far.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Bytes recorded so far.
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Current reading.
    pub fn snapshot(&self) -> MeterSnapshot {
        MeterSnapshot { count: self.count(), bytes: self.bytes() }
    }
}

impl std::ops::Add for MeterSnapshot {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            count: self.count.wrapping_add(rhs.count),
            bytes: self.bytes.wrapping_add(rhs.bytes),
        }
    }
}

impl std::iter::Sum for MeterSnapshot {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, s| acc + s)
    }
}

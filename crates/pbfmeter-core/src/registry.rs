//! Fixed set of meters shared by every connection.
//!
//! The registry is built once at node startup with one [`Meter`] per
//! [`MeterKey`] and handed to each metered stream behind an `Arc`. The key
//! set is closed (it is an enum product), so resolving a key can never fail
//! and the registry never grows or shrinks.
//!
//! Each meter sits on its own cache line. Connections hammering different
//! buckets do not contend; connections hammering the same bucket contend
//! only on the atomic add.

use std::sync::Arc;

use crossbeam_utils::CachePadded;
use pbfmeter_proto::Direction;
use serde::Serialize;

use crate::{Meter, MeterKey, MeterSnapshot, MeteringError};

/// Resolved reference to one meter of a [`MeterRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeterHandle(usize);

/// Exported view of one meter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterReading {
    /// Full meter name, e.g. `pbf/req/headers/in`
    pub name: String,
    /// Bucket the reading belongs to
    pub key: MeterKey,
    /// Counter values
    #[serde(flatten)]
    pub value: MeterSnapshot,
}

impl MeterReading {
    /// Exporter name of the event counter (`<name>/packets`).
    pub fn packets_name(&self) -> String {
        format!("{}/packets", self.name)
    }

    /// Exporter name of the byte counter (`<name>/traffic`).
    pub fn traffic_name(&self) -> String {
        format!("{}/traffic", self.name)
    }
}

/// Process-wide set of traffic meters.
#[derive(Debug)]
pub struct MeterRegistry {
    namespace: String,
    meters: [CachePadded<Meter>; MeterKey::COUNT],
}

impl MeterRegistry {
    /// Build every meter under `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let meters = std::array::from_fn(|index| {
            CachePadded::new(Meter::new(MeterKey::from_index(index).name(&namespace)))
        });

        tracing::debug!(namespace = %namespace, meters = MeterKey::COUNT, "meter registry created");
        Self { namespace, meters }
    }

    /// Build a registry ready to share across connections.
    pub fn shared(namespace: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(namespace))
    }

    /// Prefix of every meter name.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resolve the meter for `key`.
    #[inline]
    pub fn get(&self, key: MeterKey) -> MeterHandle {
        MeterHandle(key.index())
    }

    /// Record `events` events of `bytes` bytes against `handle`.
    #[inline]
    pub fn increment(&self, handle: MeterHandle, events: u64, bytes: u64) {
        self.meter(handle).mark(events, bytes);
    }

    /// Shorthand for `increment(get(key), ..)`.
    #[inline]
    pub fn record(&self, key: MeterKey, events: u64, bytes: u64) {
        self.increment(self.get(key), events, bytes);
    }

    /// The meter behind `handle`.
    pub fn meter(&self, handle: MeterHandle) -> &Meter {
        &self.meters[handle.0]
    }

    /// Current reading for `key`.
    pub fn read(&self, key: MeterKey) -> MeterSnapshot {
        self.meter(self.get(key)).snapshot()
    }

    /// Find a meter by its full name.
    ///
    /// Accepts the bare name (`pbf/misc/in`) as well as either exporter
    /// suffix (`/packets`, `/traffic`).
    pub fn lookup(&self, name: &str) -> Result<&Meter, MeteringError> {
        let base = name
            .strip_suffix("/packets")
            .or_else(|| name.strip_suffix("/traffic"))
            .unwrap_or(name);

        self.meters
            .iter()
            .map(|m| &**m)
            .find(|m| m.name() == base)
            .ok_or_else(|| MeteringError::UnknownMeter(name.to_string()))
    }

    /// Read every meter, in registry order.
    pub fn snapshot(&self) -> Vec<MeterReading> {
        MeterKey::all()
            .map(|key| {
                let meter = self.meter(self.get(key));
                MeterReading { name: meter.name().to_string(), key, value: meter.snapshot() }
            })
            .collect()
    }

    /// Sum of all meters for `direction`.
    pub fn totals(&self, direction: Direction) -> MeterSnapshot {
        MeterKey::all().filter(|key| key.direction == direction).map(|key| self.read(key)).sum()
    }
}

impl Default for MeterRegistry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NAMESPACE)
    }
}

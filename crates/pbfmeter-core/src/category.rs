//! Accounting buckets.

use std::fmt;

use pbfmeter_proto::Direction;
use serde::Serialize;

/// Kind of traffic a message belongs to.
///
/// `Prop*` buckets hold unsolicited propagation, `Req*` buckets hold
/// request/response traffic used for synchronisation, and [`Category::Misc`]
/// catches everything else (handshake, requests whose responses are metered
/// elsewhere, unknown codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Transaction relay
    #[serde(rename = "prop/txns")]
    PropTxns,
    /// New block hash announcements
    #[serde(rename = "prop/hashes")]
    PropHashes,
    /// New block propagation
    #[serde(rename = "prop/blocks")]
    PropBlocks,
    /// Block hash lists (`pbf/61`)
    #[serde(rename = "req/hashes")]
    ReqHashes,
    /// Full blocks (`pbf/61`)
    #[serde(rename = "req/blocks")]
    ReqBlocks,
    /// Header batches (`pbf/62+`)
    #[serde(rename = "req/headers")]
    ReqHeaders,
    /// Block bodies (`pbf/62+`)
    #[serde(rename = "req/bodies")]
    ReqBodies,
    /// State trie data (`pbf/63+`)
    #[serde(rename = "req/states")]
    ReqStates,
    /// Receipts (`pbf/63+`)
    #[serde(rename = "req/receipts")]
    ReqReceipts,
    /// Everything else
    #[serde(rename = "misc")]
    Misc,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 10;

    /// Every category, in registry order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::PropTxns,
        Self::PropHashes,
        Self::PropBlocks,
        Self::ReqHashes,
        Self::ReqBlocks,
        Self::ReqHeaders,
        Self::ReqBodies,
        Self::ReqStates,
        Self::ReqReceipts,
        Self::Misc,
    ];

    /// Path segment used in meter names.
    pub const fn path(self) -> &'static str {
        match self {
            Self::PropTxns => "prop/txns",
            Self::PropHashes => "prop/hashes",
            Self::PropBlocks => "prop/blocks",
            Self::ReqHashes => "req/hashes",
            Self::ReqBlocks => "req/blocks",
            Self::ReqHeaders => "req/headers",
            Self::ReqBodies => "req/bodies",
            Self::ReqStates => "req/states",
            Self::ReqReceipts => "req/receipts",
            Self::Misc => "misc",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A category scoped to one direction; identifies exactly one meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MeterKey {
    /// Traffic kind
    pub category: Category,
    /// Traffic direction
    pub direction: Direction,
}

impl MeterKey {
    /// Number of distinct keys (categories × directions).
    pub const COUNT: usize = Category::COUNT * 2;

    /// Key for `category` in `direction`.
    pub const fn new(category: Category, direction: Direction) -> Self {
        Self { category, direction }
    }

    /// The fallback bucket for `direction`.
    pub const fn misc(direction: Direction) -> Self {
        Self::new(Category::Misc, direction)
    }

    /// Dense index in `0..COUNT`.
    pub(crate) const fn index(self) -> usize {
        self.category.index() * 2 + self.direction.index()
    }

    /// Inverse of [`MeterKey::index`]. Panics past `COUNT`.
    pub(crate) const fn from_index(index: usize) -> Self {
        Self::new(Category::ALL[index / 2], Direction::ALL[index % 2])
    }

    /// Every key, ordered by [`MeterKey::index`].
    pub fn all() -> impl Iterator<Item = Self> {
        Category::ALL
            .into_iter()
            .flat_map(|category| Direction::ALL.into_iter().map(move |d| Self::new(category, d)))
    }

    /// Meter name under `namespace`, e.g. `pbf/req/headers/in`.
    pub fn name(self, namespace: &str) -> String {
        format!("{namespace}/{}/{}", self.category.path(), self.direction.label())
    }
}

impl fmt::Display for MeterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category.path(), self.direction.label())
    }
}

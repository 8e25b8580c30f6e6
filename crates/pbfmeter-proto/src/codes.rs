//! Message codes.
//!
//! Codes `0x03..=0x06` are shared between eras with different meanings, so
//! each era gets its own constant even where the numbers coincide. Code
//! `0x08` only exists in `pbf/61`; codes `0x0d..=0x10` only from `pbf/63` on.

use crate::{ProtocolError, ProtocolVersion, Result};

/// Handshake status exchange
pub const STATUS: u64 = 0x00;
/// Announcement of new block hashes
pub const NEW_BLOCK_HASHES: u64 = 0x01;
/// Transaction relay
pub const TRANSACTIONS: u64 = 0x02;
/// Full block propagation
pub const NEW_BLOCK: u64 = 0x07;

/// `pbf/61`: request a list of block hashes
pub const GET_BLOCK_HASHES: u64 = 0x03;
/// `pbf/61`: list of block hashes
pub const BLOCK_HASHES: u64 = 0x04;
/// `pbf/61`: request full blocks
pub const GET_BLOCKS: u64 = 0x05;
/// `pbf/61`: full blocks
pub const BLOCKS: u64 = 0x06;
/// `pbf/61`: request block hashes starting at a number
pub const GET_BLOCK_HASHES_FROM_NUMBER: u64 = 0x08;

/// `pbf/62+`: request a batch of headers
pub const GET_BLOCK_HEADERS: u64 = 0x03;
/// `pbf/62+`: batch of headers
pub const BLOCK_HEADERS: u64 = 0x04;
/// `pbf/62+`: request block bodies
pub const GET_BLOCK_BODIES: u64 = 0x05;
/// `pbf/62+`: block bodies
pub const BLOCK_BODIES: u64 = 0x06;

/// `pbf/63+`: request state trie nodes
pub const GET_NODE_DATA: u64 = 0x0d;
/// `pbf/63+`: state trie nodes
pub const NODE_DATA: u64 = 0x0e;
/// `pbf/63+`: request receipts
pub const GET_RECEIPTS: u64 = 0x0f;
/// `pbf/63+`: receipts
pub const RECEIPTS: u64 = 0x10;

/// Human-readable name of `code` under `version`.
///
/// Returns `None` if the code has no meaning in that era (including every
/// code of a version this node does not speak).
pub fn name(version: ProtocolVersion, code: u64) -> Option<&'static str> {
    let era_specific = if version >= ProtocolVersion::PBF62 {
        match code {
            GET_BLOCK_HEADERS => Some("GetBlockHeaders"),
            BLOCK_HEADERS => Some("BlockHeaders"),
            GET_BLOCK_BODIES => Some("GetBlockBodies"),
            BLOCK_BODIES => Some("BlockBodies"),
            _ => None,
        }
    } else {
        match code {
            GET_BLOCK_HASHES => Some("GetBlockHashes"),
            BLOCK_HASHES => Some("BlockHashes"),
            GET_BLOCKS => Some("GetBlocks"),
            BLOCKS => Some("Blocks"),
            GET_BLOCK_HASHES_FROM_NUMBER => Some("GetBlockHashesFromNumber"),
            _ => None,
        }
    };

    let name = era_specific.or(match code {
        STATUS => Some("Status"),
        NEW_BLOCK_HASHES => Some("NewBlockHashes"),
        TRANSACTIONS => Some("Transactions"),
        NEW_BLOCK => Some("NewBlock"),
        GET_NODE_DATA if version >= ProtocolVersion::PBF63 => Some("GetNodeData"),
        NODE_DATA if version >= ProtocolVersion::PBF63 => Some("NodeData"),
        GET_RECEIPTS if version >= ProtocolVersion::PBF63 => Some("GetReceipts"),
        RECEIPTS if version >= ProtocolVersion::PBF63 => Some("Receipts"),
        _ => None,
    })?;

    // Only codes below the era's message count are on the wire at all
    let count = version.message_count()?;
    (code < count).then_some(name)
}

/// Reject codes beyond the range `version` defines.
pub fn check(version: ProtocolVersion, code: u64) -> Result<()> {
    let count = version
        .message_count()
        .ok_or(ProtocolError::UnsupportedVersion(version.get()))?;
    if code < count {
        Ok(())
    } else {
        Err(ProtocolError::CodeOutOfRange { code, version, max: count - 1 })
    }
}

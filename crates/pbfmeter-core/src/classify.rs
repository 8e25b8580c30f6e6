//! Version-aware message classification.
//!
//! Message codes are reused across protocol eras: `0x04` is a hash list under
//! `pbf/61` and a header batch from `pbf/62` on. A code-only lookup would
//! misfile historical traffic, so rules are checked most specific first and
//! the first match wins:
//!
//! 1. `pbf/61` only: block hashes, blocks
//! 2. `pbf/62+`: headers, bodies (same codes as 1, reinterpreted)
//! 3. `pbf/63+`: node data, receipts
//! 4. Any version: new block hashes, new blocks, transactions
//! 5. Everything else: misc
//!
//! Do not merge the arms. Rules 1 and 2 share codes on purpose.

use pbfmeter_proto::{Direction, ProtocolVersion, codes};

use crate::{Category, MeterKey};

/// Resolve the meter a message is accounted against.
///
/// Pure and total: every `(version, code, direction)` triple yields exactly
/// one key, and unmatched traffic lands in the direction's misc bucket.
#[inline]
pub fn classify(version: ProtocolVersion, code: u64, direction: Direction) -> MeterKey {
    MeterKey::new(category(version, code), direction)
}

fn category(version: ProtocolVersion, code: u64) -> Category {
    let legacy = version < ProtocolVersion::PBF62;
    let fast_sync = version >= ProtocolVersion::PBF63;

    match code {
        codes::BLOCK_HASHES if legacy => Category::ReqHashes,
        codes::BLOCKS if legacy => Category::ReqBlocks,

        codes::BLOCK_HEADERS if !legacy => Category::ReqHeaders,
        codes::BLOCK_BODIES if !legacy => Category::ReqBodies,

        codes::NODE_DATA if fast_sync => Category::ReqStates,
        codes::RECEIPTS if fast_sync => Category::ReqReceipts,

        codes::NEW_BLOCK_HASHES => Category::PropHashes,
        codes::NEW_BLOCK => Category::PropBlocks,
        codes::TRANSACTIONS => Category::PropTxns,

        _ => Category::Misc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V61: ProtocolVersion = ProtocolVersion::PBF61;
    const V62: ProtocolVersion = ProtocolVersion::PBF62;
    const V63: ProtocolVersion = ProtocolVersion::PBF63;

    fn cat(version: ProtocolVersion, code: u64) -> Category {
        classify(version, code, Direction::Inbound).category
    }

    #[test]
    fn reused_codes_split_by_era() {
        assert_eq!(cat(V61, 0x04), Category::ReqHashes);
        assert_eq!(cat(V62, 0x04), Category::ReqHeaders);
        assert_eq!(cat(V63, 0x04), Category::ReqHeaders);

        assert_eq!(cat(V61, 0x06), Category::ReqBlocks);
        assert_eq!(cat(V62, 0x06), Category::ReqBodies);
        assert_eq!(cat(V63, 0x06), Category::ReqBodies);
    }

    #[test]
    fn fast_sync_codes_need_pbf63() {
        assert_eq!(cat(V61, codes::NODE_DATA), Category::Misc);
        assert_eq!(cat(V62, codes::NODE_DATA), Category::Misc);
        assert_eq!(cat(V63, codes::NODE_DATA), Category::ReqStates);

        assert_eq!(cat(V62, codes::RECEIPTS), Category::Misc);
        assert_eq!(cat(V63, codes::RECEIPTS), Category::ReqReceipts);
    }

    #[test]
    fn propagation_is_version_independent() {
        for version in [ProtocolVersion::new(0), V61, V62, V63, ProtocolVersion::new(99)] {
            assert_eq!(cat(version, codes::NEW_BLOCK_HASHES), Category::PropHashes);
            assert_eq!(cat(version, codes::NEW_BLOCK), Category::PropBlocks);
            assert_eq!(cat(version, codes::TRANSACTIONS), Category::PropTxns);
        }
    }

    #[test]
    fn requests_fall_back_to_misc() {
        // Only responses get their own buckets
        for code in [
            codes::STATUS,
            codes::GET_BLOCK_HEADERS,
            codes::GET_BLOCK_BODIES,
            codes::GET_NODE_DATA,
            codes::GET_RECEIPTS,
        ] {
            assert_eq!(cat(V63, code), Category::Misc);
        }
        assert_eq!(cat(V61, codes::GET_BLOCK_HASHES_FROM_NUMBER), Category::Misc);
        assert_eq!(cat(V63, u64::MAX), Category::Misc);
    }

    #[test]
    fn direction_selects_bucket_not_rule() {
        let inbound = classify(V62, codes::BLOCK_HEADERS, Direction::Inbound);
        let outbound = classify(V62, codes::BLOCK_HEADERS, Direction::Outbound);
        assert_eq!(inbound.category, outbound.category);
        assert_eq!(inbound.direction, Direction::Inbound);
        assert_eq!(outbound.direction, Direction::Outbound);
        assert_eq!(classify(V61, 0xff, Direction::Outbound), MeterKey::misc(Direction::Outbound));
    }
}

//! Seeded generator of plausible peer traffic.
//!
//! Draws message codes from the range the protocol version defines, weighted
//! towards propagation (most real traffic is transaction relay), with payload
//! sizes spread over a few orders of magnitude. The same seed always yields
//! the same sequence.

use pbfmeter_proto::{Message, ProtocolVersion, codes};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest payload the generator emits.
pub const MAX_PAYLOAD: usize = 64 * 1024;

/// Deterministic message source for one protocol version.
#[derive(Debug, Clone)]
pub struct TrafficGenerator {
    rng: ChaCha8Rng,
    version: ProtocolVersion,
}

impl TrafficGenerator {
    /// Generator for `version` seeded with `seed`.
    pub fn new(version: ProtocolVersion, seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), version }
    }

    /// Version whose codes are generated.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Next message.
    pub fn next_message(&mut self) -> Message {
        let code = self.next_code();
        let len = self.next_len();
        Message::new(code, vec![0u8; len])
    }

    fn next_code(&mut self) -> u64 {
        // Half the time relay a transaction; otherwise pick any defined code
        if self.rng.gen_bool(0.5) {
            return codes::TRANSACTIONS;
        }
        let count = self.version.message_count().unwrap_or(codes::NEW_BLOCK + 1);
        self.rng.gen_range(0..count)
    }

    fn next_len(&mut self) -> usize {
        let magnitude = self.rng.gen_range(0..=16u32);
        let upper = (1usize << magnitude).min(MAX_PAYLOAD);
        self.rng.gen_range(0..=upper)
    }
}

impl Iterator for TrafficGenerator {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        Some(self.next_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_traffic() {
        let a: Vec<Message> = TrafficGenerator::new(ProtocolVersion::PBF63, 7).take(50).collect();
        let b: Vec<Message> = TrafficGenerator::new(ProtocolVersion::PBF63, 7).take(50).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn codes_stay_in_era_range() {
        for version in ProtocolVersion::SUPPORTED {
            let count = version.message_count().unwrap();
            for msg in TrafficGenerator::new(version, 1).take(500) {
                assert!(msg.code < count, "{version}: code {} out of range", msg.code);
                assert!(msg.payload.len() <= MAX_PAYLOAD);
                assert_eq!(msg.size as usize, msg.payload.len());
            }
        }
    }
}

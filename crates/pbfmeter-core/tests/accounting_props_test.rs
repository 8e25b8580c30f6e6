//! Property tests for classification and accounting.
//!
//! - Totality: every (version, code, direction) lands in exactly one bucket
//! - Disambiguation: reused codes split by era
//! - Conservation: counts and bytes per direction equal what went through

use std::sync::Arc;

use pbfmeter_core::{
    Category, MessageChannel, MeterKey, MeterRegistry, MeterSnapshot, Metering, classify,
};
use pbfmeter_harness::MemoryChannel;
use pbfmeter_proto::{Direction, Message, ProtocolVersion, codes};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Inbound), Just(Direction::Outbound)]
}

fn message() -> impl Strategy<Value = (u64, u32)> {
    // Mostly defined codes, some garbage
    (prop_oneof![4 => 0u64..0x11, 1 => any::<u64>()], 0u32..100_000)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

proptest! {
    #[test]
    fn classify_is_total_and_deterministic(
        version in any::<u32>(),
        code in any::<u64>(),
        dir in direction(),
    ) {
        let version = ProtocolVersion::new(version);
        let first = classify(version, code, dir);
        let second = classify(version, code, dir);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first.direction, dir);
        prop_assert_eq!(MeterKey::all().filter(|k| *k == first).count(), 1);
    }

    #[test]
    fn reused_codes_split_at_era_boundary(
        old in 0u32..62,
        new in 62u32..1000,
        dir in direction(),
    ) {
        let old = ProtocolVersion::new(old);
        let new = ProtocolVersion::new(new);

        prop_assert_eq!(classify(old, 0x04, dir).category, Category::ReqHashes);
        prop_assert_eq!(classify(new, 0x04, dir).category, Category::ReqHeaders);
        prop_assert_eq!(classify(old, 0x06, dir).category, Category::ReqBlocks);
        prop_assert_eq!(classify(new, 0x06, dir).category, Category::ReqBodies);
        prop_assert_ne!(classify(old, 0x04, dir), classify(new, 0x04, dir));
    }

    #[test]
    fn unmatched_codes_fall_to_misc(
        version in any::<u32>(),
        code in 0x11u64..,
        dir in direction(),
    ) {
        prop_assert_eq!(classify(ProtocolVersion::new(version), code, dir), MeterKey::misc(dir));
    }

    #[test]
    fn registry_conserves_counts_and_bytes(
        version in 60u32..65,
        traffic in prop::collection::vec((message(), direction()), 0..200),
    ) {
        let registry = MeterRegistry::new("pbf");
        let version = ProtocolVersion::new(version);

        for ((code, size), dir) in &traffic {
            registry.record(classify(version, *code, *dir), 1, u64::from(*size));
        }

        for dir in Direction::ALL {
            let sent: Vec<u64> = traffic
                .iter()
                .filter(|(_, d)| *d == dir)
                .map(|((_, size), _)| u64::from(*size))
                .collect();
            let expected = MeterSnapshot { count: sent.len() as u64, bytes: sent.iter().sum() };
            prop_assert_eq!(registry.totals(dir), expected);
        }
    }

    #[test]
    fn stream_conserves_inbound_traffic(
        version in prop_oneof![Just(61u32), Just(62), Just(63)],
        traffic in prop::collection::vec(message(), 1..100),
    ) {
        let registry = MeterRegistry::shared("pbf");
        let metering = Metering::with_registry(Arc::clone(&registry));
        let version = ProtocolVersion::new(version);

        runtime().block_on(async {
            let (remote, local) = MemoryChannel::pair();
            let mut local = metering.wrap(local);
            local.bind_version(version).unwrap();

            // Remote end is unmetered, so only the local reads count
            for (code, size) in &traffic {
                remote.write_message(Message::with_size(*code, *size, Vec::new())).await.unwrap();
            }
            for _ in &traffic {
                local.read_message().await.unwrap();
            }
        });

        let bytes: u64 = traffic.iter().map(|(_, size)| u64::from(*size)).sum();
        prop_assert_eq!(
            registry.totals(Direction::Inbound),
            MeterSnapshot { count: traffic.len() as u64, bytes }
        );
        prop_assert_eq!(registry.totals(Direction::Outbound), MeterSnapshot::default());
    }
}

#[test]
fn version_independent_codes_never_misc() {
    for version in 0u32..128 {
        for code in [codes::NEW_BLOCK_HASHES, codes::NEW_BLOCK, codes::TRANSACTIONS] {
            let key = classify(ProtocolVersion::new(version), code, Direction::Inbound);
            assert_ne!(key.category, Category::Misc, "version {version} code {code:#x}");
        }
    }
}

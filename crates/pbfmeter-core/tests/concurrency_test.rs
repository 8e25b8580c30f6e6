//! Concurrency tests.
//!
//! Many connections share one registry; increments must never be lost no
//! matter how tasks interleave.

use std::{sync::Arc, thread};

use pbfmeter_core::{Category, MessageChannel, MeterKey, MeterRegistry, MeterSnapshot, Metering};
use pbfmeter_harness::MemoryChannel;
use pbfmeter_proto::{Direction, Message, ProtocolVersion, codes};

const CALLERS: u64 = 16;
const PER_CALLER: u64 = 10_000;

#[test]
fn threads_on_one_meter_lose_nothing() {
    let registry = MeterRegistry::new("pbf");
    let key = MeterKey::new(Category::PropTxns, Direction::Inbound);
    let handle = registry.get(key);

    thread::scope(|s| {
        for _ in 0..CALLERS {
            s.spawn(|| {
                for _ in 0..PER_CALLER {
                    registry.increment(handle, 1, 3);
                }
            });
        }
    });

    assert_eq!(
        registry.read(key),
        MeterSnapshot { count: CALLERS * PER_CALLER, bytes: 3 * CALLERS * PER_CALLER }
    );
}

#[test]
fn threads_on_distinct_meters_stay_separate() {
    let registry = MeterRegistry::new("pbf");

    thread::scope(|s| {
        for key in MeterKey::all() {
            let registry = &registry;
            s.spawn(move || {
                for _ in 0..1_000 {
                    registry.record(key, 1, 1);
                }
            });
        }
    });

    for key in MeterKey::all() {
        assert_eq!(registry.read(key), MeterSnapshot { count: 1_000, bytes: 1_000 });
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_connections_share_registry() {
    const CONNECTIONS: u64 = 8;
    const MESSAGES: u64 = 500;

    let registry = MeterRegistry::shared("pbf");
    let metering = Metering::with_registry(Arc::clone(&registry));
    let mut tasks = Vec::new();

    for _ in 0..CONNECTIONS {
        let (a, b) = MemoryChannel::pair();
        let (mut a, mut b) = (metering.wrap(a), metering.wrap(b));
        a.bind_version(ProtocolVersion::PBF63).unwrap();
        b.bind_version(ProtocolVersion::PBF63).unwrap();
        let (a, b) = (Arc::new(a), Arc::new(b));

        // Writer and reader for each side run independently
        let writer = Arc::clone(&a);
        tasks.push(tokio::spawn(async move {
            for _ in 0..MESSAGES {
                let message = Message::new(codes::TRANSACTIONS, vec![0u8; 7]);
                writer.write_message(message).await.unwrap();
            }
        }));
        let reader = Arc::clone(&b);
        tasks.push(tokio::spawn(async move {
            for _ in 0..MESSAGES {
                reader.read_message().await.unwrap();
            }
        }));
        let writer = Arc::clone(&b);
        tasks.push(tokio::spawn(async move {
            for _ in 0..MESSAGES {
                writer.write_message(Message::new(codes::RECEIPTS, vec![0u8; 11])).await.unwrap();
            }
        }));
        let reader = Arc::clone(&a);
        tasks.push(tokio::spawn(async move {
            for _ in 0..MESSAGES {
                reader.read_message().await.unwrap();
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    let total = CONNECTIONS * MESSAGES;
    let txns = MeterSnapshot { count: total, bytes: 7 * total };
    let receipts = MeterSnapshot { count: total, bytes: 11 * total };
    assert_eq!(registry.read(MeterKey::new(Category::PropTxns, Direction::Outbound)), txns);
    assert_eq!(registry.read(MeterKey::new(Category::PropTxns, Direction::Inbound)), txns);
    assert_eq!(registry.read(MeterKey::new(Category::ReqReceipts, Direction::Outbound)), receipts);
    assert_eq!(registry.read(MeterKey::new(Category::ReqReceipts, Direction::Inbound)), receipts);
    assert_eq!(registry.totals(Direction::Inbound), txns + receipts);
}

//! Registry totals must equal the sum of what was recorded, per direction.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pbfmeter_core::{MeterRegistry, MeterSnapshot, classify};
use pbfmeter_proto::{Direction, ProtocolVersion};

fuzz_target!(|input: (u32, Vec<(u64, u32, bool)>)| {
    let (version, traffic) = input;
    let version = ProtocolVersion::new(version);
    let registry = MeterRegistry::new("fuzz");

    let mut expected = [MeterSnapshot::default(); 2];
    for (code, size, outbound) in traffic {
        let direction = if outbound { Direction::Outbound } else { Direction::Inbound };
        registry.record(classify(version, code, direction), 1, u64::from(size));
        expected[direction.index()] =
            expected[direction.index()] + MeterSnapshot { count: 1, bytes: u64::from(size) };
    }

    for direction in Direction::ALL {
        assert_eq!(registry.totals(direction), expected[direction.index()]);
    }
});

//! Classification must be total and direction-preserving for any input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pbfmeter_core::{Category, MeterKey, classify};
use pbfmeter_proto::{Direction, ProtocolVersion};

fuzz_target!(|input: (u32, u64, bool)| {
    let (version, code, outbound) = input;
    let direction = if outbound { Direction::Outbound } else { Direction::Inbound };
    let version = ProtocolVersion::new(version);

    let key = classify(version, code, direction);
    assert_eq!(key.direction, direction);
    assert_eq!(key, classify(version, code, direction));
    assert!(MeterKey::all().any(|k| k == key));

    // Codes beyond every era's range are always misc
    if code > 0x10 {
        assert_eq!(key.category, Category::Misc);
    }
});

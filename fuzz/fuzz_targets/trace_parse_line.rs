#![no_main]

use libfuzzer_sys::fuzz_target;
use lirsim::trace::parse_line;

// Fuzz the trace record parser with arbitrary lines
//
// Parsing must never panic; accepted records must round-trip their block id.
fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(Some(access)) = parse_line(line, 1) {
        let id = line.trim().split(',').next().map(str::trim);
        assert_eq!(id.and_then(|s| s.parse::<u64>().ok()), Some(access.block));
    }
});

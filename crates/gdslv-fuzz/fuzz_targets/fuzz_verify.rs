#![no_main]
use libfuzzer_sys::fuzz_target;

use gdslv_core::{verify, ConformanceLevel, VerifyConfig};

fuzz_target!(|data: &[u8]| {
    for level in [ConformanceLevel::Syntax, ConformanceLevel::Phase, ConformanceLevel::Domain] {
        let config = VerifyConfig {
            level,
            ignore_unknown_opcodes: data.first().map(|b| b & 1 == 1).unwrap_or(false),
            continue_on_error: data.first().map(|b| b & 2 == 2).unwrap_or(true),
            ..VerifyConfig::default()
        };
        let report = verify(data, &config);
        assert!(report.diagnostics.len() <= report.capacity());
    }
});

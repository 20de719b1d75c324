#![no_main]
use libfuzzer_sys::fuzz_target;

use gdslv_diff::{diff_checked, patch, DiffResult};

const PAGE_SIZES: [u32; 4] = [16, 64, 256, 4096];

fuzz_target!(|data: &[u8]| {
    // Malformed wire bytes must be rejected, never panic.
    let _ = DiffResult::from_bytes(data);

    if data.len() < 2 {
        return;
    }
    let split = data[0] as usize % data.len().max(1);
    let page_size = PAGE_SIZES[data[1] as usize % PAGE_SIZES.len()];
    let (base, target) = data.split_at(split);

    if let Ok(result) = diff_checked(base, target, page_size) {
        let recovered = patch(base, &result).expect("a diff this crate produced must always re-apply");
        assert_eq!(recovered, target, "patch must reconstruct the exact target bytes");

        let wire = result.to_bytes();
        let round_tripped = DiffResult::from_bytes(&wire).expect("our own wire encoding must parse back");
        let recovered_again = patch(base, &round_tripped).expect("a wire-round-tripped diff must still apply");
        assert_eq!(recovered_again, target);
    }
});

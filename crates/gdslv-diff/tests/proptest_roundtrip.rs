//! Property-based tests for the diff/patch round-trip and stability laws.

use gdslv_diff::{diff_checked, patch, DiffResult};
use proptest::prelude::*;

fn page_size_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(16u32), Just(32), Just(64), Just(128)]
}

proptest! {
    #[test]
    fn round_trip_law(
        base in prop::collection::vec(any::<u8>(), 0..512),
        target in prop::collection::vec(any::<u8>(), 0..512),
        page_size in page_size_strategy(),
    ) {
        let result = diff_checked(&base, &target, page_size).unwrap();
        let patched = patch(&base, &result).unwrap();
        prop_assert_eq!(patched, target);
    }

    #[test]
    fn identity_law(data in prop::collection::vec(any::<u8>(), 0..512), page_size in page_size_strategy()) {
        let result = diff_checked(&data, &data, page_size).unwrap();
        prop_assert_eq!(result.chunks.len(), 0);
    }

    #[test]
    fn stability_depends_only_on_inputs(
        base in prop::collection::vec(any::<u8>(), 0..256),
        target in prop::collection::vec(any::<u8>(), 0..256),
        page_size in page_size_strategy(),
    ) {
        let a = diff_checked(&base, &target, page_size).unwrap();
        let b = diff_checked(&base, &target, page_size).unwrap();
        prop_assert_eq!(a.changed_set(), b.changed_set());
    }

    #[test]
    fn wire_round_trip_is_lossless(
        base in prop::collection::vec(any::<u8>(), 0..256),
        target in prop::collection::vec(any::<u8>(), 0..256),
        page_size in page_size_strategy(),
    ) {
        let result = diff_checked(&base, &target, page_size).unwrap();
        let bytes = result.to_bytes();
        let parsed = DiffResult::from_bytes(&bytes).unwrap();
        prop_assert_eq!(result, parsed);
    }
}

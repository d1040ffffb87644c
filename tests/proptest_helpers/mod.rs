#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Type codes whose geometry lives in trailing coordinate arrays.
pub const COORDINATE_TYPES: [u8; 7] = [0, 4, 5, 7, 8, 9, 10];

pub fn arb_coordinate_type() -> impl Strategy<Value = u8> {
    prop::sample::select(COORDINATE_TYPES.to_vec())
}

pub fn arb_bounds_type() -> impl Strategy<Value = u8> {
    prop::sample::select(vec![1u8, 2])
}

/// Header bounds kept well inside the range where shorts read signed.
pub fn arb_bounds() -> impl Strategy<Value = (i16, i16, i16, i16)> {
    (-1000i16..4000, -1000i16..4000, 0i16..4000, 0i16..4000).prop_map(
        |(top, left, height, width)| (top, left, top.saturating_add(height), left.saturating_add(width)),
    )
}

/// Paired x/y delta arrays, including negative deltas in the clamped range.
pub fn arb_deltas(max_len: usize) -> impl Strategy<Value = (Vec<i16>, Vec<i16>)> {
    (1..=max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(-4000i16..8000, n),
            prop::collection::vec(-4000i16..8000, n),
        )
    })
}

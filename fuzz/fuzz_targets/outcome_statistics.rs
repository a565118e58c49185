#![no_main]

use abtest_sim::experiment::{compare_groups, compute_rate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte splits the rest into group A and group B
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (a, b) = rest.split_at(split);

    // Errors are expected for empty, non-binary or degenerate input; panics are not
    let _ = compute_rate(a);
    let _ = compare_groups(a, b);
});

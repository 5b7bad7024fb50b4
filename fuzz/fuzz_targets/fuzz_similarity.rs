//! Fuzz target for pairwise scoring and grouping.
//!
//! Splits the input into messages on newlines, then checks score bounds and
//! that grouping always partitions the messages.

#![no_main]
use libfuzzer_sys::fuzz_target;

use faildup_grouping::{check_partition, group_failures};
use faildup_similarity::{pair_count, score_failures};

const MAX_MESSAGES: usize = 32;

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest);
    let messages: Vec<&str> = text.split('\n').take(MAX_MESSAGES).collect();
    let threshold = f64::from(first) / 255.0;

    let scores = score_failures(&messages);
    assert_eq!(scores.len(), pair_count(messages.len()));
    for s in &scores {
        assert!((0.0..=1.0).contains(s));
    }

    let groups = group_failures(&messages, threshold);
    assert_eq!(check_partition(&groups, messages.len()), Ok(()));
});

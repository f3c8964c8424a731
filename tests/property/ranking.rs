//! The ranking order is total and input-order independent.

use ferret::scoring::{compare_scored, rank, ScoredDocument};
use ferret::SeqId;
use proptest::prelude::*;

fn scored_strategy() -> impl Strategy<Value = Vec<ScoredDocument>> {
    prop::collection::vec(
        (0u64..3, 0u32..3, prop::option::of(0i32..3)),
        0..30,
    )
    .prop_map(|docs| {
        docs.into_iter()
            .enumerate()
            .map(|(seq, (text_match, fields_matched, tie_break))| ScoredDocument {
                seq: SeqId(seq as u32),
                text_match: text_match * 1000,
                fields_matched,
                tie_break: tie_break.map(f64::from),
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_rank_ignores_input_order(docs in scored_strategy(), seed in any::<u64>()) {
        let mut sorted = docs.clone();
        rank(&mut sorted);

        // Deterministic shuffle
        let mut shuffled = docs;
        let len = shuffled.len();
        let mut state = seed;
        for i in (1..len).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }
        rank(&mut shuffled);

        let a: Vec<u32> = sorted.iter().map(|d| d.seq.get()).collect();
        let b: Vec<u32> = shuffled.iter().map(|d| d.seq.get()).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_rank_respects_keys(docs in scored_strategy()) {
        let mut sorted = docs;
        rank(&mut sorted);
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].text_match >= pair[1].text_match);
            prop_assert!(compare_scored(&pair[0], &pair[1]).is_lt());
            if pair[0].text_match == pair[1].text_match {
                prop_assert!(pair[0].fields_matched >= pair[1].fields_matched);
            }
        }
    }
}

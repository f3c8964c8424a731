// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit distance with an early-exit optimization.
//!
//! The key insight: `|len(a) - len(b)|` is a lower bound on edit distance.
//! If two strings differ in length by more than the threshold, skip the O(nm) DP.
//! Most vocabulary entries are rejected this way before anything is allocated.
//!
//! Typo budgets here are tiny (0, 1 or 2), so the row-minimum cutoff kicks in
//! after a handful of characters for anything that isn't a near miss.

/// Are these strings within `max` edits of each other?
pub fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    levenshtein_bounded(a, b, max).is_some()
}

/// Edit distance between `a` and `b`, or `None` if it exceeds `max`.
///
/// Two early-exit paths:
/// 1. If the length difference exceeds `max`, return immediately
/// 2. If the minimum of a DP row exceeds `max`, abandon the DP
///
/// Both are sound: the length difference and the row minimum are lower bounds
/// on the final distance.
pub fn levenshtein_bounded(a: &str, b: &str, max: usize) -> Option<usize> {
    if a == b {
        return Some(0);
    }

    // Character counts, not byte lengths
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();

    if a_chars.len().abs_diff(b_len) > max {
        return None;
    }

    let mut dp: Vec<usize> = (0..=b_len).collect();
    for (i, &ac) in a_chars.iter().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        let mut min_row = dp[0];

        for (j, &bc) in b_chars.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(ac != bc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
            min_row = min_row.min(dp[j + 1]);
        }

        if min_row > max {
            return None;
        }
    }

    let distance = dp[b_len];
    (distance <= max).then_some(distance)
}

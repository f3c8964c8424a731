// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy search: typo tolerance via edit distance.
//!
//! Short tokens get no typo allowance at all. "cat" is one edit away from
//! "car", "cut", "at", "bat" and half the vocabulary; letting them match each
//! other only buries the real hits.

mod levenshtein;

pub use levenshtein::*;

/// Largest typo budget a search may request.
pub const MAX_TYPOS: u32 = 2;

/// Tokens shorter than this (in chars) must match exactly.
pub const MIN_LEN_ONE_TYPO: usize = 4;

/// Tokens shorter than this (in chars) get at most one typo.
pub const MIN_LEN_TWO_TYPOS: usize = 7;

/// Typos a query token of this length may absorb, before any other cap.
pub fn typo_allowance(token: &str) -> u32 {
    let len = token.chars().count();
    if len < MIN_LEN_ONE_TYPO {
        0
    } else if len < MIN_LEN_TWO_TYPOS {
        1
    } else {
        MAX_TYPOS
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The drop-token planner: what to do when the full query finds too little.
//!
//! Two relaxations, nested:
//!
//! 1. **Typo levels.** Every slot range is searched with 0 typos first, then 1,
//!    then 2. A level only runs while fewer than `typo_tokens_threshold`
//!    documents have been found, so typo matches never crowd out exact ones.
//! 2. **Dropping tokens.** If the full query still found fewer than
//!    `drop_tokens_threshold` documents, drop slots from the right, then from
//!    the left:
//!
//! ```text
//! a b c d   →   a b c   →   a b   →   a   →   b c d   →   c d   →   d
//! ```
//!
//! Results accumulate across rounds. A document keeps the match it was first
//! found with, which is always its best one: earlier rounds use more slots and
//! fewer typos. A candidate cap therefore keeps the earliest-found documents
//! and stops the walk once reached. The walk is finite by construction: at most `2n - 1` ranges,
//! each with at most three typo levels.

use std::ops::Range;

use tracing::debug;

use crate::search::matcher::{Matcher, Matches};
use crate::search::query::Slot;
use crate::types::SeqId;

/// Slot ranges to try, in order. At least one slot always remains.
pub fn plan(slot_count: usize) -> Vec<Range<usize>> {
    if slot_count == 0 {
        return Vec::new();
    }
    let mut ranges = Vec::with_capacity(2 * slot_count - 1);
    ranges.push(0..slot_count);
    // Drop from the right
    for end in (1..slot_count).rev() {
        ranges.push(0..end);
    }
    // Drop from the left
    for start in 1..slot_count {
        ranges.push(start..slot_count);
    }
    ranges
}

#[derive(Debug, Clone, Copy)]
pub struct Planner {
    /// Drop slots while fewer than this many documents were found. 0 disables.
    pub drop_tokens_threshold: usize,
    /// Try the next typo level while fewer than this many documents were found.
    pub typo_tokens_threshold: usize,
    /// Highest typo level to try.
    pub max_typos: u32,
    /// Stop collecting once this many documents were found.
    pub max_candidates: usize,
}

impl Planner {
    /// Walk the plan, accumulating documents that pass `accept`.
    pub fn execute<F>(&self, matcher: &Matcher<'_>, slots: &[Slot], accept: F) -> Matches
    where
        F: Fn(SeqId) -> bool,
    {
        let mut found = Matches::new();

        for (round, range) in plan(slots.len()).into_iter().enumerate() {
            if round > 0
                && (self.drop_tokens_threshold == 0 || found.len() >= self.drop_tokens_threshold)
            {
                break;
            }

            for typo_level in 0..=self.max_typos {
                let matches = matcher.run(slots, range.clone(), typo_level);
                for (seq, fields) in matches {
                    if found.len() >= self.max_candidates {
                        break;
                    }
                    if accept(seq) {
                        found.entry(seq).or_insert(fields);
                    }
                }

                debug!(
                    ?range,
                    typo_level,
                    found = found.len(),
                    "planner round"
                );

                if found.len() >= self.max_candidates {
                    return found;
                }
                if found.len() >= self.typo_tokens_threshold {
                    break;
                }
            }
        }

        found
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind text match scores.
//!
//! Everything is integer. Two documents that matched the same way get exactly
//! the same score, so ties are real ties and fall through to the tie-break
//! field and insertion order instead of floating-point noise.
//!
//! # Key Invariant: Match Kind Dominance
//!
//! Per matched token, in the same field:
//!
//! ```text
//! exact (1000) > prefix (800) > 1 typo (400) > 2 typos (150)
//! ```
//!
//! Proximity and repetition bonuses are small next to these gaps: the maximum
//! occurrence bonus (50) can't lift a typo match over an exact one, and an
//! adjacency bonus (50) only separates documents that otherwise matched alike.
//!
//! # Constants
//!
//! | Constant            | Value | Why this value |
//! |---------------------|-------|----------------|
//! | Exact token         | 1000  | Baseline |
//! | Prefix token        | 800   | Search-as-you-type should stay close to exact |
//! | 1 typo              | 400   | Clearly below a prefix completion |
//! | 2 typos             | 150   | Barely above nothing |
//! | Full-field bonus    | 1000  | "GED" titled "GED" beats "GED" inside a longer title |
//! | Adjacency           | 50    | Per consecutive slot pair at consecutive positions |
//! | Extra occurrence    | 10    | At most 5 counted |
//!
//! Field weights multiply the field quality, so with a large enough weight ratio
//! a weak match in a heavy field beats a strong match in a light one.

use crate::index::MatchKind;
use crate::search::matcher::FieldMatch;

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

pub const EXACT_TOKEN_SCORE: u64 = 1000;
pub const PREFIX_TOKEN_SCORE: u64 = 800;
pub const ONE_TYPO_TOKEN_SCORE: u64 = 400;
pub const TWO_TYPO_TOKEN_SCORE: u64 = 150;

/// Single-slot query matching a field's whole value exactly.
pub const FULL_FIELD_BONUS: u64 = 1000;

/// Per pair of consecutive slots matched at consecutive positions.
pub const ADJACENCY_BONUS: u64 = 50;

/// Per extra occurrence of a matched term in the field.
pub const OCCURRENCE_BONUS: u64 = 10;

/// Extra occurrences beyond this are not rewarded.
pub const MAX_COUNTED_OCCURRENCES: u32 = 5;

/// Score of one matched token.
pub fn token_score(kind: MatchKind) -> u64 {
    match kind {
        MatchKind::Exact => EXACT_TOKEN_SCORE,
        MatchKind::Prefix => PREFIX_TOKEN_SCORE,
        MatchKind::Typo(1) => ONE_TYPO_TOKEN_SCORE,
        MatchKind::Typo(_) => TWO_TYPO_TOKEN_SCORE,
    }
}

/// Quality of one field's match, before weighting.
pub fn field_quality(field: &FieldMatch, prioritize_exact_match: bool) -> u64 {
    let tokens: u64 = field.slots.iter().map(|s| token_score(s.kind)).sum();

    let full_field = if prioritize_exact_match && field.full_field {
        FULL_FIELD_BONUS
    } else {
        0
    };

    let adjacency = ADJACENCY_BONUS * u64::from(field.adjacent_pairs);
    let occurrences =
        OCCURRENCE_BONUS * u64::from(field.extra_occurrences().min(MAX_COUNTED_OCCURRENCES));

    tokens + full_field + adjacency + occurrences
}

/// Weighted sum of field qualities. `weights` is indexed by searched field.
/// A field without a weight counts once.
pub fn text_match(fields: &[FieldMatch], weights: &[u32], prioritize_exact_match: bool) -> u64 {
    fields
        .iter()
        .map(|f| {
            let weight = weights.get(f.field).copied().unwrap_or(1);
            u64::from(weight) * field_quality(f, prioritize_exact_match)
        })
        .sum()
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers.
//!
//! The key insight is that the *way* a token matched (exact, prefix, typo)
//! dominates everything else within a field, and field weights decide between
//! fields. Ranking then only has to sort integers.

mod core;
pub mod ranking;

pub use self::core::*;
pub use ranking::{compare_scored, rank, ScoredDocument};

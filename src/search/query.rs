// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query slots.
//!
//! A slot is one position of the query. Usually it holds a single token, but a
//! synonym group turns a run of query tokens into one slot whose alternatives
//! are every phrase of the group: `i pod` becomes one slot `{ipod | i pod | pod}`.
//! Dropping, prefix matching and adjacency all work on slots, so a synonym
//! phrase is never half-dropped.

/// One query position and the phrases that satisfy it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Alternatives in preference order; the first is what the user typed.
    /// Every alternative is a non-empty token list.
    pub alternatives: Vec<Vec<String>>,
}

impl Slot {
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            alternatives: vec![vec![token.into()]],
        }
    }

    /// What the user typed for this slot.
    pub fn typed(&self) -> &[String] {
        self.alternatives.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tokens of every alternative, flattened. Used for reporting.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.alternatives.iter().flatten().map(String::as_str)
    }
}

/// One slot per token, no synonyms.
pub fn slots_from_tokens<I, S>(tokens: I) -> Vec<Slot>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tokens.into_iter().map(Slot::token).collect()
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query rules: overrides first, then synonyms.
//!
//! Resolution turns the raw query into what the planner actually searches:
//!
//! ```text
//! raw query ──► overrides (id order) ──► rewritten tokens ──► synonyms ──► slots
//!                  │
//!                  └──► pinned ids, excluded ids, matched override ids
//! ```
//!
//! Overrides are evaluated against the normalized raw query. Every override
//! that fires contributes its pins and exclusions. The first one with a
//! `replace_query` decides the query text; `remove_matched_tokens` cuts the
//! matched run out of it instead. A query left with no tokens by removal
//! becomes a match-all query.
//!
//! The `*` query is only matched by overrides whose rule query is `*` too.
//! Those contribute pins and exclusions; the query stays match-all.

mod overrides;
mod synonyms;

pub use overrides::{MatchType, Override, OverrideExclude, OverrideInclude, OverrideRule};
pub use synonyms::{expand, Synonym};

use std::collections::BTreeMap;

use crate::search::query::Slot;
use crate::search::WILDCARD_QUERY;
use crate::tokenizer::Tokenizer;

/// What the rules made of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Slots to search. Empty for a match-all query.
    pub slots: Vec<Slot>,
    /// Search every document: the raw query was `*`, or removal emptied it.
    pub match_all: bool,
    /// `(id, 1-based position)`, in override order.
    pub pinned: Vec<(String, usize)>,
    pub excluded: Vec<String>,
    pub matched_overrides: Vec<String>,
}

impl Resolution {
    /// Record a fired override's id, pins and exclusions.
    fn apply(&mut self, ov: &Override) {
        self.matched_overrides.push(ov.id.clone());
        self.pinned
            .extend(ov.includes.iter().map(|inc| (inc.id.clone(), inc.position)));
        self.excluded
            .extend(ov.excludes.iter().map(|exc| exc.id.clone()));
    }
}

/// Overrides and synonyms of one collection, keyed (and therefore evaluated)
/// by id.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    overrides: BTreeMap<String, Override>,
    synonyms: BTreeMap<String, Synonym>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id.
    pub fn upsert_override(&mut self, ov: Override) {
        self.overrides.insert(ov.id.clone(), ov);
    }

    pub fn remove_override(&mut self, id: &str) -> Option<Override> {
        self.overrides.remove(id)
    }

    pub fn upsert_synonym(&mut self, synonym: Synonym) {
        self.synonyms.insert(synonym.id.clone(), synonym);
    }

    pub fn remove_synonym(&mut self, id: &str) -> Option<Synonym> {
        self.synonyms.remove(id)
    }

    pub fn overrides(&self) -> impl Iterator<Item = &Override> {
        self.overrides.values()
    }

    pub fn synonyms(&self) -> impl Iterator<Item = &Synonym> {
        self.synonyms.values()
    }

    pub fn get_override(&self, id: &str) -> Option<&Override> {
        self.overrides.get(id)
    }

    pub fn get_synonym(&self, id: &str) -> Option<&Synonym> {
        self.synonyms.get(id)
    }

    /// Apply overrides (when enabled) and synonyms to `raw_query`.
    pub fn resolve(&self, raw_query: &str, tokenizer: &Tokenizer, enable_overrides: bool) -> Resolution {
        let mut resolution = Resolution::default();

        if raw_query.trim() == WILDCARD_QUERY {
            resolution.match_all = true;
            if enable_overrides {
                for ov in self.overrides.values().filter(|ov| ov.is_wildcard()) {
                    resolution.apply(ov);
                }
            }
            return resolution;
        }

        let original = tokenizer.tokenize_query(raw_query);
        let mut tokens = original.clone();
        let mut replaced = false;
        let mut removed = false;

        if enable_overrides {
            for ov in self.overrides.values() {
                let Some(run) = ov.matched_run(&original, tokenizer) else {
                    continue;
                };
                resolution.apply(ov);

                if replaced {
                    continue;
                }
                if let Some(replacement) = &ov.replace_query {
                    tokens = tokenizer.tokenize_query(replacement);
                    replaced = true;
                } else if ov.remove_matched_tokens {
                    if let Some(current) = overrides::find_run(&tokens, &original[run]) {
                        tokens.drain(current);
                        removed = true;
                    }
                }
            }
        }

        if tokens.is_empty() && removed {
            resolution.match_all = true;
            return resolution;
        }

        resolution.slots = expand(&tokens, self.synonyms.values(), tokenizer);
        resolution
    }
}

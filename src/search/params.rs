// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search parameters: everything a caller can say about a search.
//!
//! Every knob has a default, so `SearchParams::new("fox", &["title"])` is a
//! complete search. The builder methods exist for tests and the CLI; the
//! struct also deserializes from JSON with the same defaults.

use serde::{Deserialize, Serialize};

pub const DEFAULT_NUM_TYPOS: u32 = 2;
pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 250;
pub const DEFAULT_DROP_TOKENS_THRESHOLD: usize = 10;
pub const DEFAULT_TYPO_TOKENS_THRESHOLD: usize = 100;
pub const DEFAULT_SNIPPET_THRESHOLD: usize = 30;
pub const DEFAULT_HIGHLIGHT_AFFIX_NUM_TOKENS: usize = 4;
pub const DEFAULT_HIGHLIGHT_START_TAG: &str = "<mark>";
pub const DEFAULT_HIGHLIGHT_END_TAG: &str = "</mark>";

/// Query that matches every document.
pub const WILDCARD_QUERY: &str = "*";

/// Pin document `id` at 1-based `position` of the ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedHit {
    pub id: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Raw query text, or `*` for match-all.
    pub q: String,
    /// Fields to search, in priority order. Empty means every searchable field.
    pub query_by: Vec<String>,
    /// One weight per `query_by` field. Empty means `max(15 - i, 1)`.
    pub query_by_weights: Vec<u32>,
    /// Conjunctive filter, e.g. `points:>10 && in_stock:true`.
    pub filter_by: Option<String>,
    /// Typo budget: one value for all fields, or one per `query_by` field.
    pub num_typos: Vec<u32>,
    /// Prefix matching of the last token: one value, or one per field.
    pub prefix: Vec<bool>,
    /// 1-based.
    pub page: u32,
    pub per_page: usize,
    /// Drop tokens while fewer than this many documents were found. 0 disables.
    pub drop_tokens_threshold: usize,
    /// Widen the typo budget while fewer than this many documents were found.
    pub typo_tokens_threshold: usize,
    /// Fields to keep in returned documents. Empty keeps all.
    pub include_fields: Vec<String>,
    /// Fields to drop from returned documents and from default highlighting.
    pub exclude_fields: Vec<String>,
    /// Fields with at most this many words are returned whole as snippets.
    pub snippet_threshold: usize,
    /// Words of context on each side of a snippet.
    pub highlight_affix_num_tokens: usize,
    /// Fields whose whole highlighted value is returned.
    pub highlight_full_fields: Vec<String>,
    /// Fields to highlight. Overrides the default selection and `exclude_fields`.
    pub highlight_fields: Vec<String>,
    pub highlight_start_tag: String,
    pub highlight_end_tag: String,
    /// Consider at most this many candidates, in the order the planner finds them.
    pub max_candidates: Option<usize>,
    /// Boost a single token matching a whole field value exactly.
    pub prioritize_exact_match: bool,
    pub enable_overrides: bool,
    pub pinned_hits: Vec<PinnedHit>,
    pub hidden_hits: Vec<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            query_by: Vec::new(),
            query_by_weights: Vec::new(),
            filter_by: None,
            num_typos: vec![DEFAULT_NUM_TYPOS],
            prefix: vec![true],
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            drop_tokens_threshold: DEFAULT_DROP_TOKENS_THRESHOLD,
            typo_tokens_threshold: DEFAULT_TYPO_TOKENS_THRESHOLD,
            include_fields: Vec::new(),
            exclude_fields: Vec::new(),
            snippet_threshold: DEFAULT_SNIPPET_THRESHOLD,
            highlight_affix_num_tokens: DEFAULT_HIGHLIGHT_AFFIX_NUM_TOKENS,
            highlight_full_fields: Vec::new(),
            highlight_fields: Vec::new(),
            highlight_start_tag: DEFAULT_HIGHLIGHT_START_TAG.to_string(),
            highlight_end_tag: DEFAULT_HIGHLIGHT_END_TAG.to_string(),
            max_candidates: None,
            prioritize_exact_match: true,
            enable_overrides: true,
            pinned_hits: Vec::new(),
            hidden_hits: Vec::new(),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl SearchParams {
    pub fn new(q: impl Into<String>, query_by: &[&str]) -> Self {
        Self {
            q: q.into(),
            query_by: owned(query_by),
            ..Self::default()
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.q.trim() == WILDCARD_QUERY
    }

    pub fn weights(mut self, weights: &[u32]) -> Self {
        self.query_by_weights = weights.to_vec();
        self
    }

    pub fn filter(mut self, filter_by: impl Into<String>) -> Self {
        self.filter_by = Some(filter_by.into());
        self
    }

    pub fn typos(mut self, num_typos: u32) -> Self {
        self.num_typos = vec![num_typos];
        self
    }

    pub fn typos_per_field(mut self, num_typos: &[u32]) -> Self {
        self.num_typos = num_typos.to_vec();
        self
    }

    pub fn prefix(mut self, prefix: bool) -> Self {
        self.prefix = vec![prefix];
        self
    }

    pub fn prefix_per_field(mut self, prefix: &[bool]) -> Self {
        self.prefix = prefix.to_vec();
        self
    }

    pub fn page(mut self, page: u32, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub fn drop_tokens_threshold(mut self, threshold: usize) -> Self {
        self.drop_tokens_threshold = threshold;
        self
    }

    pub fn typo_tokens_threshold(mut self, threshold: usize) -> Self {
        self.typo_tokens_threshold = threshold;
        self
    }

    pub fn include_fields(mut self, fields: &[&str]) -> Self {
        self.include_fields = owned(fields);
        self
    }

    pub fn exclude_fields(mut self, fields: &[&str]) -> Self {
        self.exclude_fields = owned(fields);
        self
    }

    pub fn snippet_threshold(mut self, threshold: usize) -> Self {
        self.snippet_threshold = threshold;
        self
    }

    pub fn highlight_affix_num_tokens(mut self, affix: usize) -> Self {
        self.highlight_affix_num_tokens = affix;
        self
    }

    pub fn highlight_full_fields(mut self, fields: &[&str]) -> Self {
        self.highlight_full_fields = owned(fields);
        self
    }

    pub fn highlight_fields(mut self, fields: &[&str]) -> Self {
        self.highlight_fields = owned(fields);
        self
    }

    pub fn highlight_tags(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.highlight_start_tag = start.into();
        self.highlight_end_tag = end.into();
        self
    }

    pub fn max_candidates(mut self, limit: usize) -> Self {
        self.max_candidates = Some(limit);
        self
    }

    pub fn prioritize_exact_match(mut self, enabled: bool) -> Self {
        self.prioritize_exact_match = enabled;
        self
    }

    pub fn enable_overrides(mut self, enabled: bool) -> Self {
        self.enable_overrides = enabled;
        self
    }

    pub fn pin(mut self, id: impl Into<String>, position: usize) -> Self {
        self.pinned_hits.push(PinnedHit {
            id: id.into(),
            position,
        });
        self
    }

    pub fn hide(mut self, id: impl Into<String>) -> Self {
        self.hidden_hits.push(id.into());
        self
    }
}

/// Default weight of the `i`-th searched field: earlier fields weigh more.
pub fn default_weight(i: usize) -> u32 {
    15u32.saturating_sub(i as u32).max(1)
}

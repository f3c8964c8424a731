// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Curation overrides: pin, hide and rewrite for specific queries.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tokenizer::Tokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Normalized query equals the rule query.
    Exact,
    /// Rule tokens occur in the query as a contiguous run.
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub query: String,
    #[serde(rename = "match")]
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideInclude {
    pub id: String,
    /// 1-based.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideExclude {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub id: String,
    pub rule: OverrideRule,
    #[serde(default)]
    pub includes: Vec<OverrideInclude>,
    #[serde(default)]
    pub excludes: Vec<OverrideExclude>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_query: Option<String>,
    #[serde(default)]
    pub remove_matched_tokens: bool,
}

impl Override {
    pub fn new(id: impl Into<String>, query: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            id: id.into(),
            rule: OverrideRule {
                query: query.into(),
                match_type,
            },
            includes: Vec::new(),
            excludes: Vec::new(),
            replace_query: None,
            remove_matched_tokens: false,
        }
    }

    pub fn include(mut self, id: impl Into<String>, position: usize) -> Self {
        self.includes.push(OverrideInclude {
            id: id.into(),
            position,
        });
        self
    }

    pub fn exclude(mut self, id: impl Into<String>) -> Self {
        self.excludes.push(OverrideExclude { id: id.into() });
        self
    }

    pub fn replace_query(mut self, query: impl Into<String>) -> Self {
        self.replace_query = Some(query.into());
        self
    }

    pub fn remove_matched_tokens(mut self) -> Self {
        self.remove_matched_tokens = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidParameter("Override `id` must not be empty.".into()));
        }
        if self.rule.query.trim().is_empty() {
            return Err(Error::InvalidParameter(format!(
                "Override `{}` has an empty rule query.",
                self.id
            )));
        }
        if self.includes.iter().any(|inc| inc.position == 0) {
            return Err(Error::InvalidParameter(format!(
                "Override `{}`: include positions are 1-based.",
                self.id
            )));
        }
        Ok(())
    }

    /// The rule query is `*`: fires only on the wildcard query.
    pub fn is_wildcard(&self) -> bool {
        self.rule.query.trim() == crate::search::WILDCARD_QUERY
    }

    /// Where the rule matches `query_tokens`: the token range of the run, or
    /// the whole query for an exact match. `None` if it doesn't fire.
    pub fn matched_run(&self, query_tokens: &[String], tokenizer: &Tokenizer) -> Option<std::ops::Range<usize>> {
        let rule_tokens = tokenizer.tokenize_query(&self.rule.query);
        if rule_tokens.is_empty() {
            return None;
        }
        match self.rule.match_type {
            MatchType::Exact => (query_tokens == rule_tokens.as_slice()).then(|| 0..query_tokens.len()),
            MatchType::Contains => find_run(query_tokens, &rule_tokens),
        }
    }
}

/// First occurrence of `needle` as a contiguous run of `haystack`.
pub(crate) fn find_run(haystack: &[String], needle: &[String]) -> Option<std::ops::Range<usize>> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|start| start..start + needle.len())
}

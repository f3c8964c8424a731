// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Synonym groups and query expansion into slots.
//!
//! A multi-way group `{ipod, i pod, pod}` makes any member stand for all of
//! them. A one-way group with root `smartphone` and synonyms `{iphone, pixel}`
//! expands `smartphone` only; searching `iphone` stays `iphone`.
//!
//! Expansion scans the query left to right and, at each position, takes the
//! longest member phrase that starts there. That run of tokens becomes one slot.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::search::query::Slot;
use crate::tokenizer::Tokenizer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub id: String,
    /// One-way root phrase. Absent for multi-way groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    pub synonyms: Vec<String>,
}

impl Synonym {
    pub fn multi_way(id: impl Into<String>, synonyms: &[&str]) -> Self {
        Self {
            id: id.into(),
            root: None,
            synonyms: synonyms.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn one_way(id: impl Into<String>, root: impl Into<String>, synonyms: &[&str]) -> Self {
        Self {
            id: id.into(),
            root: Some(root.into()),
            synonyms: synonyms.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidParameter("Synonym `id` must not be empty.".into()));
        }
        if self.synonyms.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "Synonym `{}` has no synonyms.",
                self.id
            )));
        }
        if self.root.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(Error::InvalidParameter(format!(
                "Synonym `{}` has an empty root.",
                self.id
            )));
        }
        Ok(())
    }
}

/// A synonym group in token form.
#[derive(Debug, Clone)]
struct Group {
    triggers: Vec<Vec<String>>,
    members: Vec<Vec<String>>,
}

fn tokenized(phrases: &[String], tokenizer: &Tokenizer) -> Vec<Vec<String>> {
    phrases
        .iter()
        .map(|p| tokenizer.tokenize_query(p))
        .filter(|t| !t.is_empty())
        .collect()
}

fn group_of(synonym: &Synonym, tokenizer: &Tokenizer) -> Group {
    let synonyms = tokenized(&synonym.synonyms, tokenizer);
    match &synonym.root {
        Some(root) => {
            let root = tokenizer.tokenize_query(root);
            let mut members = vec![root.clone()];
            members.extend(synonyms);
            Group {
                triggers: if root.is_empty() { Vec::new() } else { vec![root] },
                members,
            }
        }
        None => Group {
            triggers: synonyms.clone(),
            members: synonyms,
        },
    }
}

/// Turn query tokens into slots, folding synonym runs into single slots.
pub fn expand<'a, I>(tokens: &[String], synonyms: I, tokenizer: &Tokenizer) -> Vec<Slot>
where
    I: IntoIterator<Item = &'a Synonym>,
{
    let groups: Vec<Group> = synonyms.into_iter().map(|s| group_of(s, tokenizer)).collect();
    let mut slots = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let rest = &tokens[i..];
        let longest = groups
            .iter()
            .flat_map(|g| g.triggers.iter())
            .filter(|t| rest.starts_with(t))
            .map(Vec::len)
            .max();

        let Some(len) = longest else {
            slots.push(Slot::token(tokens[i].clone()));
            i += 1;
            continue;
        };

        let run = rest[..len].to_vec();
        let mut alternatives = vec![run.clone()];
        for group in groups.iter().filter(|g| g.triggers.contains(&run)) {
            for member in &group.members {
                if !alternatives.contains(member) {
                    alternatives.push(member.clone());
                }
            }
        }
        slots.push(Slot { alternatives });
        i += len;
    }

    slots
}

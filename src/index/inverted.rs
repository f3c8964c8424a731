// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-field inverted index.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSITIONS_SORTED**: Every position list is sorted ascending and non-empty
//! 2. **NO_EMPTY_TERMS**: A term with no postings is removed from the vocabulary
//! 3. **ELEMENT_GAP**: Array elements are laid out with a one-position gap, so no
//!    adjacency ever spans two elements
//! 4. **DOC_TERMS_COMPLETE**: `docs[seq].terms` lists every term that has a
//!    posting for `seq`; removal relies on it

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::fuzzy::levenshtein_bounded;
use crate::tokenizer::Token;
use crate::types::SeqId;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Vocabulary size above which the fuzzy scan goes parallel.
#[cfg(feature = "parallel")]
const PARALLEL_SCAN_MIN_TERMS: usize = 4096;

/// Positions of one term, per document.
pub type Postings = BTreeMap<SeqId, Vec<u32>>;

/// How a vocabulary term relates to a query token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Exact,
    /// Query token is a strict literal prefix of the term.
    Prefix,
    /// Whole-token match within this many edits (1 or 2).
    Typo(u32),
}

impl MatchKind {
    pub fn typos(self) -> u32 {
        match self {
            MatchKind::Typo(n) => n,
            _ => 0,
        }
    }

    pub fn is_prefix(self) -> bool {
        matches!(self, MatchKind::Prefix)
    }

    /// Lower is better: exact, prefix, one typo, two typos.
    pub fn rank(self) -> u32 {
        match self {
            MatchKind::Exact => 0,
            MatchKind::Prefix => 1,
            MatchKind::Typo(n) => 1 + n,
        }
    }
}

/// A vocabulary term that satisfies a query token.
#[derive(Debug, Clone, Copy)]
pub struct TermMatch<'a> {
    pub term: &'a str,
    pub kind: MatchKind,
}

/// Token span of one value (or one array element) of a document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpan {
    pub start: u32,
    pub len: u32,
}

#[derive(Debug, Clone, Default)]
struct DocEntry {
    elements: Vec<ElementSpan>,
    terms: BTreeSet<String>,
}

/// Inverted index of one text field.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    terms: BTreeMap<String, Postings>,
    docs: HashMap<SeqId, DocEntry>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a document's value: one token list per array element, or a single
    /// list for a scalar field. Replaces any previous entry for `seq`.
    pub fn insert(&mut self, seq: SeqId, elements: &[Vec<Token>]) {
        self.remove(seq);

        let mut entry = DocEntry::default();
        let mut base = 0u32;

        for tokens in elements {
            let len = tokens.len() as u32;
            entry.elements.push(ElementSpan { start: base, len });
            for token in tokens {
                let positions = self
                    .terms
                    .entry(token.text.clone())
                    .or_default()
                    .entry(seq)
                    .or_default();
                positions.push(base + token.position);
                entry.terms.insert(token.text.clone());
            }
            // INVARIANT: ELEMENT_GAP
            base += len + 1;
        }

        if !entry.terms.is_empty() {
            self.docs.insert(seq, entry);
        }
    }

    /// Forget every posting of `seq`. Unknown ids are ignored.
    pub fn remove(&mut self, seq: SeqId) {
        let Some(entry) = self.docs.remove(&seq) else {
            return;
        };
        for term in entry.terms {
            if let Some(postings) = self.terms.get_mut(&term) {
                postings.remove(&seq);
                // INVARIANT: NO_EMPTY_TERMS
                if postings.is_empty() {
                    self.terms.remove(&term);
                }
            }
        }
    }

    pub fn postings(&self, term: &str) -> Option<&Postings> {
        self.terms.get(term)
    }

    /// Positions of `term` in `seq`, sorted.
    pub fn positions(&self, term: &str, seq: SeqId) -> Option<&[u32]> {
        self.terms
            .get(term)
            .and_then(|p| p.get(&seq))
            .map(Vec::as_slice)
    }

    /// Element spans of a document's value, in element order.
    pub fn elements(&self, seq: SeqId) -> &[ElementSpan] {
        self.docs
            .get(&seq)
            .map(|e| e.elements.as_slice())
            .unwrap_or(&[])
    }

    /// Length in tokens of the element containing `position`.
    pub fn element_len_at(&self, seq: SeqId, position: u32) -> Option<u32> {
        self.elements(seq)
            .iter()
            .find(|e| position >= e.start && position < e.start + e.len)
            .map(|e| e.len)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    pub fn num_documents(&self) -> usize {
        self.docs.len()
    }

    /// Terms that strictly extend `prefix`, in term order.
    pub fn prefix_terms<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.terms
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(term, _)| term.starts_with(prefix))
            .filter(move |(term, _)| term.as_str() != prefix)
            .map(|(term, _)| term.as_str())
    }

    /// Terms within `1..=max_typos` edits of `token`, in term order.
    pub fn fuzzy_terms(&self, token: &str, max_typos: u32) -> Vec<(&str, u32)> {
        if max_typos == 0 {
            return Vec::new();
        }
        let max = max_typos as usize;

        #[cfg(feature = "parallel")]
        {
            if self.terms.len() >= PARALLEL_SCAN_MIN_TERMS {
                let vocabulary: Vec<&String> = self.terms.keys().collect();
                // Collecting an indexed parallel iterator keeps term order.
                return vocabulary
                    .into_par_iter()
                    .filter_map(|term| typo_distance(token, term, max).map(|d| (term.as_str(), d)))
                    .collect();
            }
        }

        self.terms
            .keys()
            .filter_map(|term| typo_distance(token, term, max).map(|d| (term.as_str(), d)))
            .collect()
    }

    /// Every vocabulary term that satisfies `token` under the given budget.
    ///
    /// Each term appears once, with its best kind: a term that is both a prefix
    /// extension and a typo neighbour counts as a prefix match.
    pub fn term_matches<'a>(
        &'a self,
        token: &'a str,
        max_typos: u32,
        prefix: bool,
    ) -> Vec<TermMatch<'a>> {
        let mut best: BTreeMap<&'a str, MatchKind> = BTreeMap::new();

        if let Some((term, _)) = self.terms.get_key_value(token) {
            best.insert(term.as_str(), MatchKind::Exact);
        }
        if prefix {
            for term in self.prefix_terms(token) {
                best.entry(term).or_insert(MatchKind::Prefix);
            }
        }
        for (term, typos) in self.fuzzy_terms(token, max_typos) {
            best.entry(term).or_insert(MatchKind::Typo(typos));
        }

        best.into_iter()
            .map(|(term, kind)| TermMatch { term, kind })
            .collect()
    }
}

/// Edit distance in `1..=max`; exact matches are not typos.
fn typo_distance(token: &str, term: &str, max: usize) -> Option<u32> {
    match levenshtein_bounded(token, term, max) {
        Some(d) if d > 0 => Some(d as u32),
        _ => None,
    }
}

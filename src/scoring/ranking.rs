// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: a total order over scored documents.
//!
//! Sort order:
//! 1. **Text match** - higher wins
//! 2. **Fields matched** - more distinct fields wins
//! 3. **Tie-break value** - the collection's default sorting field, higher wins;
//!    documents without one sort last
//! 4. **Seq id** - insertion order, for absolute determinism
//!
//! The last key is unique per document, so the order is total: the same
//! collection and the same query always rank the same way.

use std::cmp::Ordering;

use crate::types::SeqId;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub seq: SeqId,
    pub text_match: u64,
    pub fields_matched: u32,
    pub tie_break: Option<f64>,
}

/// Compare two scored documents; `Less` means `a` ranks first.
pub fn compare_scored(a: &ScoredDocument, b: &ScoredDocument) -> Ordering {
    b.text_match
        .cmp(&a.text_match)
        .then_with(|| b.fields_matched.cmp(&a.fields_matched))
        .then_with(|| match (a.tie_break, b.tie_break) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.seq.cmp(&b.seq))
}

/// Sort best first.
pub fn rank(docs: &mut [ScoredDocument]) {
    docs.sort_by(compare_scored);
}

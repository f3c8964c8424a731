// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The matcher: which documents satisfy which query slots, and how well.
//!
//! For every searched field and every slot, the matcher looks up the vocabulary
//! terms the slot accepts (exact, within the typo budget, or as a literal prefix
//! when the slot is last) and gathers their positions per document. Then, per
//! document and field, each slot claims one position:
//!
//! ```text
//! query:  john    j
//! field:  John    Jennings
//!          ^0      ^1
//! "john" claims 0 (exact). "j" could prefix-match both words, but 0 is
//! taken, so it claims 1.
//! ```
//!
//! Slots claim in query order, best match kind first, lowest position on ties.
//! A document is a candidate only if every slot matched in *some* field: the
//! query is AND across slots and OR across fields.
//!
//! # Typo budget
//!
//! `min(typo_level, field budget, length allowance)`. The typo level is the
//! planner's relaxation round; the length allowance keeps short tokens exact.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::fuzzy::typo_allowance;
use crate::index::{FieldIndex, MatchKind};
use crate::search::query::Slot;
use crate::types::SeqId;

/// A searched field with its per-search rules.
#[derive(Debug, Clone, Copy)]
pub struct SearchField<'a> {
    pub index: &'a FieldIndex,
    pub num_typos: u32,
    pub prefix: bool,
}

/// The position a slot claimed in a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMatch {
    /// Slot index in the full query, not the reduced range.
    pub slot: usize,
    pub position: u32,
    /// Tokens covered: 1, or the length of a synonym phrase.
    pub span: u32,
    pub kind: MatchKind,
    /// Index term (or phrase) that matched.
    pub term: String,
    /// How many times the term occurs in the field.
    pub occurrences: u32,
}

/// How one field of one document matched the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// Index into the searched field list.
    pub field: usize,
    /// Matched slots, in slot order.
    pub slots: Vec<SlotMatch>,
    /// Consecutive slots matched at consecutive positions.
    pub adjacent_pairs: u32,
    /// A single-slot query matched the field's whole value exactly.
    pub full_field: bool,
    /// Typo level of the round that produced this match.
    pub typo_level: u32,
    /// Slot (full-query index) that was allowed to prefix-match, if any.
    pub prefix_slot: Option<usize>,
}

impl FieldMatch {
    pub fn typos(&self) -> u32 {
        self.slots.iter().map(|s| s.kind.typos()).sum()
    }

    pub fn prefixes(&self) -> u32 {
        self.slots.iter().filter(|s| s.kind.is_prefix()).count() as u32
    }

    /// Occurrences beyond the first, summed over matched slots.
    pub fn extra_occurrences(&self) -> u32 {
        self.slots
            .iter()
            .map(|s| s.occurrences.saturating_sub(1))
            .sum()
    }
}

/// Per-document field matches.
pub type Matches = BTreeMap<SeqId, Vec<FieldMatch>>;

/// Every listed document, with no field matches. The `*` query.
pub fn match_all(seqs: impl IntoIterator<Item = SeqId>) -> Matches {
    seqs.into_iter().map(|seq| (seq, Vec::new())).collect()
}

#[derive(Debug, Clone)]
struct Candidate<'a> {
    position: u32,
    span: u32,
    kind: MatchKind,
    term: Cow<'a, str>,
    occurrences: u32,
}

pub struct Matcher<'a> {
    fields: &'a [SearchField<'a>],
}

impl<'a> Matcher<'a> {
    pub fn new(fields: &'a [SearchField<'a>]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[SearchField<'a>] {
        self.fields
    }

    /// Documents matching every slot in `range` at the given typo level.
    pub fn run(&self, slots: &[Slot], range: Range<usize>, typo_level: u32) -> Matches {
        let mut matches = Matches::new();
        if range.is_empty() || range.end > slots.len() {
            return matches;
        }
        let last = range.end - 1;
        let rules = ClaimRules {
            range: range.clone(),
            query_len: slots.len(),
            typo_level,
        };

        for (field_pos, field) in self.fields.iter().enumerate() {
            let candidates: Vec<BTreeMap<SeqId, Vec<Candidate<'_>>>> = range
                .clone()
                .map(|slot| {
                    let prefix = field.prefix && slot == last;
                    let budget = typo_level.min(field.num_typos);
                    slot_candidates(field.index, &slots[slot], budget, prefix)
                })
                .collect();

            let docs: BTreeSet<SeqId> = candidates
                .iter()
                .flat_map(|per_slot| per_slot.keys().copied())
                .collect();

            for seq in docs {
                let prefix_slot = field.prefix.then_some(last);
                if let Some(field_match) = claim(field_pos, field.index, seq, &candidates, &rules, prefix_slot) {
                    matches.entry(seq).or_default().push(field_match);
                }
            }
        }

        // AND across slots, OR across fields
        matches.retain(|_, fields| {
            let covered: BTreeSet<usize> = fields
                .iter()
                .flat_map(|f| f.slots.iter().map(|s| s.slot))
                .collect();
            covered.len() == range.len()
        });

        matches
    }
}

/// Positions each document offers to `slot`, best first.
fn slot_candidates<'a>(
    index: &'a FieldIndex,
    slot: &'a Slot,
    max_typos: u32,
    prefix: bool,
) -> BTreeMap<SeqId, Vec<Candidate<'a>>> {
    let mut out: BTreeMap<SeqId, Vec<Candidate<'a>>> = BTreeMap::new();

    for alternative in &slot.alternatives {
        match alternative.as_slice() {
            [] => {}
            [token] => {
                let budget = max_typos.min(typo_allowance(token));
                for tm in index.term_matches(token, budget, prefix) {
                    let Some(postings) = index.postings(tm.term) else {
                        continue;
                    };
                    for (seq, positions) in postings {
                        let list = out.entry(*seq).or_default();
                        list.extend(positions.iter().map(|&position| Candidate {
                            position,
                            span: 1,
                            kind: tm.kind,
                            term: Cow::Borrowed(tm.term),
                            occurrences: positions.len() as u32,
                        }));
                    }
                }
            }
            phrase => phrase_candidates(index, phrase, &mut out),
        }
    }

    for list in out.values_mut() {
        list.sort_by_key(|c| (c.kind.rank(), c.position));
    }
    out
}

/// Multi-token synonym phrases match exactly, at consecutive positions.
fn phrase_candidates<'a>(
    index: &'a FieldIndex,
    phrase: &[String],
    out: &mut BTreeMap<SeqId, Vec<Candidate<'a>>>,
) {
    let Some(postings) = index.postings(&phrase[0]) else {
        return;
    };
    let joined = phrase.join(" ");

    for (seq, positions) in postings {
        let starts: Vec<u32> = positions
            .iter()
            .copied()
            .filter(|&start| {
                phrase[1..].iter().enumerate().all(|(i, token)| {
                    index
                        .positions(token, *seq)
                        .is_some_and(|ps| ps.binary_search(&(start + 1 + i as u32)).is_ok())
                })
            })
            .collect();
        if starts.is_empty() {
            continue;
        }

        let occurrences = starts.len() as u32;
        out.entry(*seq)
            .or_default()
            .extend(starts.into_iter().map(|position| Candidate {
                position,
                span: phrase.len() as u32,
                kind: MatchKind::Exact,
                term: Cow::Owned(joined.clone()),
                occurrences,
            }));
    }
}

/// The round a claim happens in.
struct ClaimRules {
    range: Range<usize>,
    /// Slots in the whole query, dropped ones included.
    query_len: usize,
    typo_level: u32,
}

/// Let each slot claim a distinct position of the field, in slot order.
fn claim(
    field_pos: usize,
    index: &FieldIndex,
    seq: SeqId,
    candidates: &[BTreeMap<SeqId, Vec<Candidate<'_>>>],
    rules: &ClaimRules,
    prefix_slot: Option<usize>,
) -> Option<FieldMatch> {
    let mut taken: Vec<(u32, u32)> = Vec::new();
    let mut slots = Vec::new();

    for (offset, per_slot) in candidates.iter().enumerate() {
        let Some(list) = per_slot.get(&seq) else {
            continue;
        };
        let free = list.iter().find(|c| {
            taken
                .iter()
                .all(|&(start, span)| c.position + c.span <= start || start + span <= c.position)
        });
        if let Some(c) = free {
            taken.push((c.position, c.span));
            slots.push(SlotMatch {
                slot: rules.range.start + offset,
                position: c.position,
                span: c.span,
                kind: c.kind,
                term: c.term.to_string(),
                occurrences: c.occurrences,
            });
        }
    }

    if slots.is_empty() {
        return None;
    }

    let adjacent_pairs = slots
        .windows(2)
        .filter(|w| w[1].slot == w[0].slot + 1 && w[1].position == w[0].position + w[0].span)
        .count() as u32;

    // Only a one-slot query earns it; a dropped round never does
    let full_field = rules.query_len == 1
        && slots[0].kind == MatchKind::Exact
        && index.element_len_at(seq, slots[0].position) == Some(slots[0].span);

    Some(FieldMatch {
        field: field_pos,
        slots,
        adjacent_pairs,
        full_field,
        typo_level: rules.typo_level,
        prefix_slot,
    })
}

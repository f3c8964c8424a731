// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Highlighting: show the user *why* a document matched.
//!
//! The highlighter re-tokenizes the stored field value (the index only keeps
//! normalized tokens) and marks every original word that has a token
//! satisfying some query slot under the rules the hit was matched with: the
//! typo level of its round, and prefix matching only for the slot that was
//! last in that round. Marks wrap the whole original word, casing and punctuation included:
//! `<mark>Port,</mark>`. Everything between words is copied byte for byte.
//!
//! All slots of the resolved query take part, including slots the planner
//! dropped to find the document: a document found by `brown` alone still gets
//! `fox` marked if it happens to contain it elsewhere.
//!
//! # Snippets
//!
//! ```text
//! ≤ snippet_threshold words:  whole value
//! longer:                     best window of snippet_threshold words
//!                             → first..last marked word in it
//!                             → ± highlight_affix_num_tokens words
//! ```

use serde_json::Value;

use crate::fuzzy::{levenshtein_within, typo_allowance};
use crate::search::query::Slot;
use crate::tokenizer::{Analyzed, Tokenizer};
use crate::types::Highlight;

#[derive(Debug, Clone)]
pub struct HighlightOptions<'a> {
    pub start_tag: &'a str,
    pub end_tag: &'a str,
    pub snippet_threshold: usize,
    pub affix: usize,
}

/// A field to highlight and the token rules that apply to it.
#[derive(Debug, Clone, Copy)]
pub struct HighlightField<'a> {
    pub name: &'a str,
    pub num_typos: u32,
    /// Slot allowed to match a word prefix.
    pub prefix_slot: Option<usize>,
    /// Also return the whole highlighted value.
    pub full: bool,
}

pub struct Highlighter<'a> {
    tokenizer: &'a Tokenizer,
    slots: &'a [Slot],
    options: HighlightOptions<'a>,
}

/// Highlight of one string value.
#[derive(Debug)]
struct Marked {
    snippet: String,
    value: Option<String>,
    matched_tokens: Vec<String>,
}

impl<'a> Highlighter<'a> {
    pub fn new(tokenizer: &'a Tokenizer, slots: &'a [Slot], options: HighlightOptions<'a>) -> Self {
        Self {
            tokenizer,
            slots,
            options,
        }
    }

    /// Highlights of `fields`, in the given order. Fields that are missing, not
    /// text, or have no matching word are skipped.
    pub fn highlight(&self, document: &Value, fields: &[HighlightField<'_>]) -> Vec<Highlight> {
        if self.slots.is_empty() {
            return Vec::new();
        }
        fields
            .iter()
            .filter_map(|field| {
                document
                    .get(field.name)
                    .and_then(|value| self.highlight_field(field, value))
            })
            .collect()
    }

    pub fn highlight_field(&self, field: &HighlightField<'_>, value: &Value) -> Option<Highlight> {
        if self.slots.is_empty() {
            return None;
        }
        match value {
            Value::String(text) => {
                let marked = self.mark(text, field)?;
                Some(Highlight {
                    field: field.name.to_string(),
                    snippet: marked.snippet,
                    value: marked.value,
                    matched_tokens: marked.matched_tokens,
                    indices: None,
                })
            }
            Value::Array(items) => {
                let mut indices = Vec::new();
                let mut best: Option<Marked> = None;

                for (i, item) in items.iter().enumerate() {
                    let Some(text) = item.as_str() else { continue };
                    let Some(marked) = self.mark(text, field) else {
                        continue;
                    };
                    indices.push(i);
                    // Most matched words wins; earliest element on ties
                    let better = best
                        .as_ref()
                        .map_or(true, |b| marked.matched_tokens.len() > b.matched_tokens.len());
                    if better {
                        best = Some(marked);
                    }
                }

                let best = best?;
                Some(Highlight {
                    field: field.name.to_string(),
                    snippet: best.snippet,
                    value: best.value,
                    matched_tokens: best.matched_tokens,
                    indices: Some(indices),
                })
            }
            _ => None,
        }
    }

    fn mark(&self, text: &str, field: &HighlightField<'_>) -> Option<Marked> {
        let analyzed = self.tokenizer.analyze(text);
        let marked = self.marked_words(&analyzed, field);
        if !marked.iter().any(|&m| m) {
            return None;
        }

        let words = &analyzed.words;
        let last_word = words.len() - 1;
        let threshold = self.options.snippet_threshold.max(1);

        let snippet = if words.len() <= threshold {
            self.render(text, &analyzed, &marked, 0, last_word)
        } else {
            let (from, to) = snippet_bounds(&marked, threshold, self.options.affix);
            self.render(text, &analyzed, &marked, from, to)
        };

        let value = field
            .full
            .then(|| self.render(text, &analyzed, &marked, 0, last_word));

        let matched_tokens = words
            .iter()
            .zip(&marked)
            .filter(|(_, m)| **m)
            .map(|(w, _)| text[w.start..w.end].to_string())
            .collect();

        Some(Marked {
            snippet,
            value,
            matched_tokens,
        })
    }

    /// Per word: does any of its tokens satisfy a slot?
    fn marked_words(&self, analyzed: &Analyzed, field: &HighlightField<'_>) -> Vec<bool> {
        let mut marked = vec![false; analyzed.words.len()];
        let tokens = &analyzed.tokens;

        for (i, token) in tokens.iter().enumerate() {
            for (s, slot) in self.slots.iter().enumerate() {
                let prefix = field.prefix_slot == Some(s);
                for alternative in &slot.alternatives {
                    match alternative.as_slice() {
                        [] => {}
                        [query_token] => {
                            if token_matches(&token.text, query_token, field.num_typos, prefix) {
                                marked[token.word as usize] = true;
                            }
                        }
                        phrase => {
                            let run = tokens.get(i..i + phrase.len());
                            let hit = run.is_some_and(|run| {
                                run.iter().zip(phrase).all(|(t, p)| &t.text == p)
                            });
                            if hit {
                                for t in tokens[i..i + phrase.len()].iter() {
                                    marked[t.word as usize] = true;
                                }
                            }
                        }
                    }
                }
            }
        }

        marked
    }

    /// Words `from..=to` with marks, original separators preserved.
    fn render(&self, text: &str, analyzed: &Analyzed, marked: &[bool], from: usize, to: usize) -> String {
        let words = &analyzed.words;
        let mut out = String::with_capacity(words[to].end - words[from].start + 32);
        let mut cursor = words[from].start;

        for w in from..=to {
            let span = words[w];
            out.push_str(&text[cursor..span.start]);
            if marked[w] {
                out.push_str(self.options.start_tag);
                out.push_str(&text[span.start..span.end]);
                out.push_str(self.options.end_tag);
            } else {
                out.push_str(&text[span.start..span.end]);
            }
            cursor = span.end;
        }

        out
    }
}

/// Same acceptance rule as the matcher, applied to a single token.
fn token_matches(token: &str, query_token: &str, num_typos: u32, prefix: bool) -> bool {
    if token == query_token || (prefix && token.starts_with(query_token)) {
        return true;
    }
    let budget = num_typos.min(typo_allowance(query_token));
    budget > 0 && levenshtein_within(query_token, token, budget as usize)
}

/// Word range of the snippet for a value longer than `window` words.
fn snippet_bounds(marked: &[bool], window: usize, affix: usize) -> (usize, usize) {
    let n = marked.len();
    let window = window.min(n);

    // Sliding window with the most marked words, earliest on ties
    let mut count = marked[..window].iter().filter(|&&m| m).count();
    let (mut best_start, mut best_count) = (0, count);
    for start in 1..=(n - window) {
        if marked[start - 1] {
            count -= 1;
        }
        if marked[start + window - 1] {
            count += 1;
        }
        if count > best_count {
            best_start = start;
            best_count = count;
        }
    }

    let in_window = best_start..best_start + window;
    let first = in_window.clone().find(|&w| marked[w]).unwrap_or(best_start);
    let last = in_window.rev().find(|&w| marked[w]).unwrap_or(first);

    (first.saturating_sub(affix), (last + affix).min(n - 1))
}

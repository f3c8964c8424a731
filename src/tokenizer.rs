// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text → tokens, for both documents and queries.
//!
//! Documents and queries must go through the exact same pipeline, otherwise
//! "Café" in a title never meets "cafe" in a query. The pipeline:
//!
//! 1. Split on Unicode whitespace into *words*, remembering each word's byte span
//!    in the original text. The highlighter needs those spans to wrap the
//!    original, un-normalized word.
//! 2. Fold each word: NFD decompose, drop combining marks, lowercase.
//! 3. Clean: keep alphanumerics. `-` and `.` survive only between two kept
//!    characters, so `802.11ax` and `rj-45` stay whole while `Port,` becomes
//!    `port`. Every other symbol disappears.
//!
//! Hyphenated compounds are a policy choice. By default
//! `open-access-may-become-mandatory` is a single token; with
//! [`TokenizerConfig::split_on_hyphen`] it becomes five, all pointing back at
//! the same word.

use serde::{Deserialize, Serialize};

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Tokenizer policy, stored with the collection schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Split `a-b-c` into `a`, `b`, `c` instead of keeping one token.
    pub split_on_hyphen: bool,
}

/// A normalized token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Index in the token sequence of the text.
    pub position: u32,
    /// Index of the whitespace-delimited word this token came from.
    pub word: u32,
}

/// Byte span of a whitespace-delimited word in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
}

/// Tokens plus the word spans they point into.
#[derive(Debug, Clone, Default)]
pub struct Analyzed {
    pub words: Vec<WordSpan>,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Ordered tokens of `text`. Zero tokens for empty or all-punctuation input.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.analyze(text).tokens
    }

    /// Token texts only, the shape queries are handled in.
    pub fn tokenize_query(&self, query: &str) -> Vec<String> {
        self.tokenize(query).into_iter().map(|t| t.text).collect()
    }

    /// Canonical form of a query: its tokens joined by single spaces.
    pub fn normalize_query(&self, query: &str) -> String {
        self.tokenize_query(query).join(" ")
    }

    /// Tokenize and keep the word spans for highlighting.
    pub fn analyze(&self, text: &str) -> Analyzed {
        let mut analyzed = Analyzed::default();

        for (start, word) in split_words(text) {
            let word_idx = analyzed.words.len() as u32;
            analyzed.words.push(WordSpan {
                start,
                end: start + word.len(),
            });

            for piece in self.word_tokens(word) {
                let position = analyzed.tokens.len() as u32;
                analyzed.tokens.push(Token {
                    text: piece,
                    position,
                    word: word_idx,
                });
            }
        }

        analyzed
    }

    fn word_tokens(&self, word: &str) -> Vec<String> {
        let folded = fold(word);
        if self.config.split_on_hyphen {
            folded
                .split('-')
                .map(clean)
                .filter(|t| !t.is_empty())
                .collect()
        } else {
            let token = clean(&folded);
            if token.is_empty() {
                Vec::new()
            } else {
                vec![token]
            }
        }
    }
}

/// Whitespace-delimited words with their byte offsets.
fn split_words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                words.push((s, &text[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push((s, &text[s..]));
    }

    words.into_iter()
}

/// Lowercase and strip diacritics: "PRÍNCIPE" → "principe".
#[cfg(feature = "unicode-normalization")]
pub fn fold(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Without unicode-normalization: lowercase only.
#[cfg(not(feature = "unicode-normalization"))]
pub fn fold(value: &str) -> String {
    value.to_lowercase()
}

#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Keep alphanumerics; keep `-`/`.` only between two kept characters.
fn clean(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len());

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if c == '-' || c == '.' {
            let after_kept = out.chars().last().is_some_and(char::is_alphanumeric);
            let before_kept = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            if after_kept && before_kept {
                out.push(c);
            }
        }
    }

    out
}

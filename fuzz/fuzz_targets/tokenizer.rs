// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the tokenizer.
//!
//! Word spans must slice the input on char boundaries, and normalizing a
//! normalized query must be a no-op.

#![no_main]

use ferret::{Tokenizer, TokenizerConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (bool, &str)| {
    let (split_on_hyphen, text) = input;
    let tokenizer = Tokenizer::new(TokenizerConfig { split_on_hyphen });

    let analyzed = tokenizer.analyze(text);
    for span in &analyzed.words {
        // Panics if the span is not on a char boundary
        let word = &text[span.start..span.end];
        assert!(!word.is_empty());
        assert!(!word.chars().any(char::is_whitespace));
    }
    for (i, token) in analyzed.tokens.iter().enumerate() {
        assert_eq!(token.position as usize, i);
        assert!(!token.text.is_empty());
        assert!((token.word as usize) < analyzed.words.len());
    }

    let once = tokenizer.normalize_query(text);
    let twice = tokenizer.normalize_query(&once);
    assert_eq!(once, twice, "normalization is not idempotent for {:?}", text);
});

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for `filter_by` parsing.
//!
//! Any string either parses or comes back as an invalid-parameter error, and a
//! parsed filter can be evaluated against any document.

#![no_main]

use ferret::testing::products_schema;
use ferret::{Error, Filter, Tokenizer};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|expr: &str| {
    let schema = products_schema("products");
    let tokenizer = Tokenizer::default();

    match Filter::parse(expr, &schema, &tokenizer) {
        Ok(filter) => {
            let docs = [
                json!({"id": "0", "title": "t", "brand": "Acme", "price": 1.5,
                       "in_stock": true, "rating": 3, "tags": ["x", "y"]}),
                json!({"id": "1", "title": "t", "brand": "Globex", "price": -4,
                       "in_stock": false, "rating": -1}),
                json!({}),
            ];
            for doc in &docs {
                let _ = filter.matches(doc);
            }
        }
        Err(Error::InvalidParameter(_)) => {}
        Err(other) => panic!("unexpected error kind for {:?}: {:?}", expr, other),
    }
});

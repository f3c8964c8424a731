// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for search query handling.
//!
//! Throws arbitrary queries and per-query knobs at a small collection with
//! synonyms and overrides loaded. Search must never panic and its results must
//! stay well formed.

#![no_main]

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use arbitrary::Arbitrary;
use ferret::testing::{add_all, make_collection, products_schema};
use ferret::{Collection, MatchType, Override, SearchParams, Synonym};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

#[derive(Debug, Arbitrary)]
struct QueryInput {
    query: String,
    num_typos: u8,
    prefix: bool,
    drop_tokens_threshold: u8,
    typo_tokens_threshold: u8,
    per_page: u8,
    snippet_threshold: u8,
    affix: u8,
    pin: Option<(u8, u8)>,
    hide: Option<u8>,
}

fn collection() -> &'static Arc<Collection> {
    static COLLECTION: OnceLock<Arc<Collection>> = OnceLock::new();
    COLLECTION.get_or_init(|| {
        let coll = make_collection(products_schema("products"));
        let titles = [
            "Wireless Charger Pad",
            "Apple iPod touch",
            "Apple i pod nano",
            "USB-C cable, 2m (braided)",
            "PRÍNCIPE São Tomé guide",
            "open-access-may-become-mandatory",
            "802.11ax Wi-Fi 6 router",
            "Gigabit Ethernet Port, RJ-45",
        ];
        let docs: Vec<_> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                json!({
                    "id": i.to_string(),
                    "title": title,
                    "description": format!("{} with extras and more words for snippets", title),
                    "tags": ["a", title],
                    "brand": "Acme",
                    "price": i as f64,
                    "in_stock": i % 2 == 0,
                    "rating": i as i64,
                })
            })
            .collect();
        add_all(&coll, &docs);
        let _ = coll.add_synonym(Synonym::multi_way("ipod", &["ipod", "i pod", "pod"]));
        let _ = coll.add_override(Override::new("pin", "apple", MatchType::Contains).include("4", 1));
        coll
    })
}

fuzz_target!(|input: QueryInput| {
    let coll = collection();
    let query: String = input.query.chars().take(200).collect();

    let mut params = SearchParams::new(query.as_str(), &["title", "description", "tags"])
        .typos(u32::from(input.num_typos % 3))
        .prefix(input.prefix)
        .drop_tokens_threshold(usize::from(input.drop_tokens_threshold))
        .typo_tokens_threshold(usize::from(input.typo_tokens_threshold))
        .page(1, usize::from(input.per_page % 20) + 1)
        .snippet_threshold(usize::from(input.snippet_threshold % 40))
        .highlight_affix_num_tokens(usize::from(input.affix % 8))
        .highlight_full_fields(&["title"]);
    if let Some((id, position)) = input.pin {
        params = params.pin((id % 10).to_string(), usize::from(position % 10) + 1);
    }
    if let Some(id) = input.hide {
        params = params.hide((id % 10).to_string());
    }

    // Valid parameters: search must succeed
    let result = coll.search(&params).expect("search failed on valid parameters");

    assert!(result.found <= result.out_of);
    assert!(result.hits.len() <= params.per_page);

    let mut seen = HashSet::new();
    for hit in &result.hits {
        assert!(seen.insert(hit.id().to_string()), "duplicate hit {}", hit.id());
        assert!(coll.get(hit.id()).is_ok());
        for h in &hit.highlights {
            assert!(h.snippet.contains("<mark>"), "highlight without a mark: {:?}", h);
        }
    }
    if let Some(hidden) = params.hidden_hits.first() {
        assert!(!seen.contains(hidden));
    }
});

//! Typo budgets, prefix completion and token normalization as seen through
//! `Collection::search`.

use super::common::{collection_with, ids, make_collection, search, snippet, titles_collection};
use ferret::{CollectionSchema, Field, FieldType, SearchParams, TokenizerConfig};
use serde_json::json;

// ============================================================================
// NORMALIZATION
// ============================================================================

#[test]
fn hyphenated_title_is_one_token() {
    let coll = titles_collection(&[("open-access-may-become-mandatory-for-nih-funded-research", 100)]);

    let result = search(
        &coll,
        &SearchParams::new("open-access-may-become-mandatory-for-nih-funded-research", &["title"])
            .typos(0)
            .drop_tokens_threshold(5),
    );
    assert_eq!(result.found, 1);
    assert_eq!(ids(&result), vec!["0"]);

    // Inner pieces are not terms of their own
    let result = search(&coll, &SearchParams::new("mandatory", &["title"]).typos(0));
    assert_eq!(result.found, 0);
}

#[test]
fn split_on_hyphen_indexes_the_pieces() {
    let schema = CollectionSchema::new(
        "split",
        vec![
            Field::new("title", FieldType::String),
            Field::new("points", FieldType::Int32),
        ],
    )
    .with_sorting_field("points")
    .with_tokenizer(TokenizerConfig {
        split_on_hyphen: true,
    });
    let coll = make_collection(schema);
    super::common::add_all(
        &coll,
        &[json!({"id": "0", "title": "open-access-may-become-mandatory", "points": 1})],
    );

    let result = search(&coll, &SearchParams::new("mandatory access", &["title"]).typos(0));
    assert_eq!(ids(&result), vec!["0"]);
    // The whole hyphenated word is marked once
    assert_eq!(
        snippet(&result, 0, "title").as_deref(),
        Some("<mark>open-access-may-become-mandatory</mark>")
    );
}

#[test]
fn case_and_diacritics_are_folded() {
    let coll = titles_collection(&[("PRÍNCIPE - Restaurante e Snack Bar", 100)]);

    let result = search(&coll, &SearchParams::new("principe", &["title"]).typos(0));
    assert_eq!(ids(&result), vec!["0"]);
    assert_eq!(
        snippet(&result, 0, "title").as_deref(),
        Some("<mark>PRÍNCIPE</mark> - Restaurante e Snack Bar")
    );
}

// ============================================================================
// TYPOS
// ============================================================================

#[test]
fn typo_allowance_grows_with_token_length() {
    let coll = titles_collection(&[("The quick brown fox", 1), ("Wireless charger", 2)]);

    // 3 chars: exact only
    assert_eq!(search(&coll, &SearchParams::new("fix", &["title"]).prefix(false)).found, 0);
    // 4-6 chars: one typo
    assert_eq!(ids(&search(&coll, &SearchParams::new("quck", &["title"]))), vec!["0"]);
    assert_eq!(search(&coll, &SearchParams::new("qck", &["title"]).prefix(false)).found, 0);
    // 7+ chars: two typos
    assert_eq!(
        ids(&search(&coll, &SearchParams::new("wirelss", &["title"]).prefix(false))),
        vec!["1"]
    );
    assert_eq!(
        ids(&search(&coll, &SearchParams::new("chrager", &["title"]).prefix(false))),
        vec!["1"]
    );
}

#[test]
fn zero_typos_disables_fuzzy_matching() {
    let coll = titles_collection(&[("Wireless charger", 2)]);

    let result = search(
        &coll,
        &SearchParams::new("wirelss", &["title"]).typos(0).prefix(false),
    );
    assert_eq!(result.found, 0);
}

#[test]
fn typo_budget_is_per_field() {
    let coll = collection_with(
        &["title", "description"],
        &[
            json!({"id": "0", "title": "Wireless charger", "description": "nothing here", "points": 1}),
            json!({"id": "1", "title": "nothing here", "description": "Wireless charger", "points": 2}),
        ],
    );

    let result = search(
        &coll,
        &SearchParams::new("wirelss", &["title", "description"])
            .typos_per_field(&[0, 2])
            .prefix(false),
    );
    assert_eq!(ids(&result), vec!["1"]);
}

#[test]
fn typo_on_prefix_search_without_prefix_enabled() {
    let coll = titles_collection(&[("Cisco SG25026HP Gigabit Smart Switch", 100)]);

    let result = search(
        &coll,
        &SearchParams::new("SG25026H", &["title"])
            .prefix(false)
            .drop_tokens_threshold(0)
            .typo_tokens_threshold(1),
    );
    assert_eq!(ids(&result), vec!["0"]);
}

#[test]
fn prefix_is_literal_and_never_fuzzy() {
    for title in [
        "PRÍNCIPE - Restaurante e Snack Bar",
        "Av. Mal. Humberto Delgado 206, 4760-012 Vila Nova de Famalicão, Portugal",
    ] {
        let coll = titles_collection(&[(title, 100)]);
        for prefix in [true, false] {
            let result = search(&coll, &SearchParams::new("maria", &["title"]).prefix(prefix));
            assert!(result.hits.is_empty(), "{:?} prefix={}", title, prefix);
        }
    }
}

// ============================================================================
// PREFIX
// ============================================================================

#[test]
fn prefix_applies_to_last_token_only() {
    let concat = "SPZ005 SPACEPOLE Spz005 Space Pole Updated!!! Accessories Stands & Equipment Cabinets POS \
                  Terminal Stand Spacepole 0 SPZ005";
    let coll = collection_with(&["concat"], &[json!({"id": "0", "concat": concat, "points": 100})]);

    let result = search(
        &coll,
        &SearchParams::new("spz space", &["concat"])
            .typos(1)
            .drop_tokens_threshold(0),
    );
    assert!(result.hits.is_empty());

    let result = search(
        &coll,
        &SearchParams::new("space spz", &["concat"])
            .typos(1)
            .drop_tokens_threshold(0)
            .highlight_full_fields(&["concat"]),
    );
    assert_eq!(ids(&result), vec!["0"]);

    let highlight = &result.hits[0].highlights[0];
    assert_eq!(
        highlight.value.as_deref(),
        Some(
            "<mark>SPZ005</mark> SPACEPOLE <mark>Spz005</mark> <mark>Space</mark> Pole Updated!!! \
             Accessories Stands & Equipment Cabinets POS Terminal Stand Spacepole 0 <mark>SPZ005</mark>"
        )
    );
}

#[test]
fn prefix_disabled_requires_whole_words() {
    let coll = titles_collection(&[("Rational and Irrational Numbers", 1)]);

    assert_eq!(search(&coll, &SearchParams::new("rati", &["title"])).found, 1);
    assert_eq!(
        search(&coll, &SearchParams::new("rati", &["title"]).prefix(false)).found,
        0
    );
}

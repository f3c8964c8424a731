//! Parameter validation, pagination, projection and candidate limits.

use super::common::{collection_with, ids, search, titles_collection};
use ferret::{Error, SearchParams};
use serde_json::json;

fn assert_invalid(result: ferret::Result<ferret::SearchResult>, fragment: &str) {
    match result {
        Err(Error::InvalidParameter(msg)) => {
            assert!(msg.contains(fragment), "{:?} lacks {:?}", msg, fragment)
        }
        other => panic!("expected InvalidParameter, got {:?}", other.map(|r| r.found)),
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn unknown_query_field_is_not_found() {
    let coll = titles_collection(&[("hello", 1)]);

    let err = coll.search(&SearchParams::new("hello", &["name"])).unwrap_err();
    assert_eq!(
        err,
        Error::NotFound("Could not find a field named `name` in the schema.".into())
    );
    assert_eq!(err.status_code(), 404);
}

#[test]
fn numeric_field_is_not_searchable() {
    let coll = titles_collection(&[("hello", 1)]);

    assert_invalid(coll.search(&SearchParams::new("1", &["points"])), "points");
}

#[test]
fn weights_must_match_fields() {
    let coll = collection_with(&["title", "description"], &[]);

    assert_invalid(
        coll.search(&SearchParams::new("x", &["title", "description"]).weights(&[1])),
        "query_by_weights",
    );
}

#[test]
fn per_field_rules_must_match_fields() {
    let coll = collection_with(&["title", "description", "author"], &[]);

    assert_invalid(
        coll.search(
            &SearchParams::new("x", &["title", "description", "author"]).typos_per_field(&[1, 2]),
        ),
        "num_typos",
    );
    assert_invalid(
        coll.search(
            &SearchParams::new("x", &["title", "description", "author"])
                .prefix_per_field(&[true, false]),
        ),
        "prefix",
    );
}

#[test]
fn typo_budget_is_capped_at_two() {
    let coll = titles_collection(&[("hello", 1)]);

    assert_invalid(coll.search(&SearchParams::new("x", &["title"]).typos(3)), "num_typos");
    assert!(coll.search(&SearchParams::new("x", &["title"]).typos(2)).is_ok());
}

#[test]
fn page_bounds() {
    let coll = titles_collection(&[("hello", 1)]);

    assert_invalid(coll.search(&SearchParams::new("hello", &["title"]).page(0, 10)), "Page");
    assert_invalid(
        coll.search(&SearchParams::new("hello", &["title"]).page(1, 251)),
        "250",
    );
    assert!(coll.search(&SearchParams::new("hello", &["title"]).page(1, 250)).is_ok());
}

// ============================================================================
// PAGINATION & PROJECTION
// ============================================================================

#[test]
fn pages_slice_the_ranked_list() {
    let titles: Vec<(String, i64)> = (0..25).map(|i| (format!("item {}", i), i)).collect();
    let borrowed: Vec<(&str, i64)> = titles.iter().map(|(t, p)| (t.as_str(), *p)).collect();
    let coll = titles_collection(&borrowed);

    let first = search(&coll, &SearchParams::new("item", &["title"]).page(1, 10));
    assert_eq!(first.found, 25);
    assert_eq!(first.page, 1);
    assert_eq!(first.hits.len(), 10);
    assert_eq!(first.hits[0].id(), "24");

    let last = search(&coll, &SearchParams::new("item", &["title"]).page(3, 10));
    assert_eq!(last.found, 25);
    assert_eq!(ids(&last), vec!["4", "3", "2", "1", "0"]);

    let beyond = search(&coll, &SearchParams::new("item", &["title"]).page(4, 10));
    assert_eq!(beyond.found, 25);
    assert!(beyond.hits.is_empty());
}

#[test]
fn include_and_exclude_fields_project_documents() {
    let coll = collection_with(
        &["title", "description"],
        &[json!({"id": "0", "title": "Brown fox", "description": "Quick", "points": 1})],
    );

    let result = search(
        &coll,
        &SearchParams::new("fox", &["title"]).include_fields(&["id", "title"]),
    );
    assert_eq!(result.hits[0].document, json!({"id": "0", "title": "Brown fox"}));

    let result = search(
        &coll,
        &SearchParams::new("fox", &["title"]).exclude_fields(&["description", "points"]),
    );
    assert_eq!(result.hits[0].document, json!({"id": "0", "title": "Brown fox"}));

    // Exclusion wins over inclusion
    let result = search(
        &coll,
        &SearchParams::new("fox", &["title"])
            .include_fields(&["title", "points"])
            .exclude_fields(&["points"]),
    );
    assert_eq!(result.hits[0].document, json!({"title": "Brown fox"}));
}

#[test]
fn max_candidates_keeps_earliest_documents() {
    let coll = titles_collection(&[
        ("red fox", 0),
        ("red fox", 1),
        ("red fox", 2),
        ("red fox", 3),
        ("red fox", 4),
    ]);

    let result = search(&coll, &SearchParams::new("fox", &["title"]).max_candidates(3));
    assert_eq!(result.found, 3);
    assert_eq!(ids(&result), vec!["2", "1", "0"]);
}

#[test]
fn max_candidates_keeps_exact_match_over_earlier_typo_match() {
    let coll = titles_collection(&[("Omega chargex", 50), ("Fast charger", 1)]);
    let params = SearchParams::new("charger", &["title"]).prefix(false);

    assert_eq!(ids(&search(&coll, &params.clone())), vec!["1", "0"]);

    let result = search(&coll, &params.max_candidates(1));
    assert_eq!(ids(&result), vec!["1"]);
    assert_eq!(result.found, 1);
    assert_eq!(result.hits[0].text_match, 15 * 1000);
}

#[test]
fn default_weights_decrease_with_field_order() {
    let coll = collection_with(
        &["title", "description"],
        &[json!({"id": "0", "title": "red fox", "description": "red fox", "points": 1})],
    );

    let result = search(&coll, &SearchParams::new("fox", &["title", "description"]));
    assert_eq!(result.hits[0].text_match, 15 * 1000 + 14 * 1000);
    assert_eq!(result.hits[0].fields_matched, 2);
}

#[test]
fn query_by_defaults_to_searchable_fields() {
    let coll = collection_with(
        &["title", "description"],
        &[json!({"id": "0", "title": "nothing", "description": "red fox", "points": 1})],
    );

    let result = search(&coll, &SearchParams::new("fox", &[]));
    assert_eq!(ids(&result), vec!["0"]);
    assert_eq!(result.hits[0].text_match, 14 * 1000);
}

#[test]
fn empty_query_finds_nothing() {
    let coll = titles_collection(&[("red fox", 1)]);

    let result = search(&coll, &SearchParams::new("  ?! ", &["title"]));
    assert_eq!(result.found, 0);
    assert_eq!(result.out_of, 1);
}

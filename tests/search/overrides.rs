//! Curation: override pins, excludes and query rewrites, plus per-query
//! pinned and hidden hits.

use super::common::{ids, search, titles_collection};
use ferret::{Collection, Error, MatchType, Override, SearchParams};

fn catalog() -> std::sync::Arc<Collection> {
    titles_collection(&[
        ("Apple iPod touch", 10),
        ("Apple iPod nano", 20),
        ("Samsung Galaxy", 30),
        ("iPod case", 5),
        ("Apple iPhone", 40),
    ])
}

fn add(coll: &Collection, ov: Override) {
    if let Err(err) = coll.add_override(ov) {
        panic!("override rejected: {}", err);
    }
}

fn q(query: &str) -> SearchParams {
    SearchParams::new(query, &["title"])
}

// ============================================================================
// OVERRIDES
// ============================================================================

#[test]
fn include_pins_document_at_position() {
    let coll = catalog();
    add(&coll, Override::new("pin-galaxy", "ipod", MatchType::Exact).include("2", 1));

    let result = search(&coll, &q("ipod"));
    assert_eq!(ids(&result), vec!["2", "1", "0", "3"]);
    assert_eq!(result.found, 4);
    assert_eq!(result.matched_overrides, vec!["pin-galaxy"]);
    assert_eq!(result.hits[0].text_match, 0);
}

#[test]
fn pin_past_the_end_is_appended() {
    let coll = catalog();
    add(&coll, Override::new("pin-far", "ipod", MatchType::Exact).include("2", 10));

    let result = search(&coll, &q("ipod"));
    assert_eq!(ids(&result), vec!["1", "0", "3", "2"]);
}

#[test]
fn exclude_hides_document() {
    let coll = catalog();
    add(&coll, Override::new("hide-nano", "ipod", MatchType::Exact).exclude("1"));

    let result = search(&coll, &q("ipod"));
    assert_eq!(ids(&result), vec!["0", "3"]);
    assert_eq!(result.found, 2);
}

#[test]
fn exact_rule_needs_the_whole_query_contains_rule_does_not() {
    let coll = catalog();
    add(&coll, Override::new("exact", "ipod", MatchType::Exact).exclude("0"));
    add(&coll, Override::new("contains", "nano", MatchType::Contains).include("2", 1));

    let result = search(&coll, &q("iPod  Nano"));
    assert_eq!(result.matched_overrides, vec!["contains"]);
    assert_eq!(ids(&result), vec!["2", "1", "0", "3"]);

    // Normalized query equals the rule
    let result = search(&coll, &q("IPOD"));
    assert_eq!(result.matched_overrides, vec!["exact"]);
    assert!(!ids(&result).contains(&"0".to_string()));
}

#[test]
fn replace_query_searches_the_replacement() {
    let coll = catalog();
    add(
        &coll,
        Override::new("cheap-phone", "cheap phone", MatchType::Exact).replace_query("iphone"),
    );

    let result = search(&coll, &q("cheap phone"));
    assert_eq!(ids(&result), vec!["4"]);
    assert_eq!(result.hits[0].highlights[0].snippet, "Apple <mark>iPhone</mark>");
}

#[test]
fn remove_matched_tokens_strips_the_rule_tokens() {
    let coll = catalog();
    add(
        &coll,
        Override::new("strip-apple", "apple", MatchType::Contains).remove_matched_tokens(),
    );

    let result = search(&coll, &q("apple ipod"));
    assert_eq!(ids(&result), vec!["1", "0", "3"]);

    // Nothing left: every document, by points
    let result = search(&coll, &q("apple"));
    assert_eq!(result.found, 5);
    assert_eq!(ids(&result), vec!["4", "2", "1", "0", "3"]);
}

#[test]
fn wildcard_rule_curates_wildcard_query() {
    let coll = catalog();
    add(
        &coll,
        Override::new("browse", "*", MatchType::Exact)
            .include("3", 1)
            .exclude("4"),
    );

    let result = search(&coll, &q("*"));
    assert_eq!(result.matched_overrides, vec!["browse"]);
    assert_eq!(ids(&result), vec!["3", "2", "1", "0"]);
    assert_eq!(result.found, 4);

    // Text queries are untouched
    let result = search(&coll, &q("apple"));
    assert!(result.matched_overrides.is_empty());
    assert!(ids(&result).contains(&"4".to_string()));
}

#[test]
fn overrides_can_be_disabled_per_query() {
    let coll = catalog();
    add(
        &coll,
        Override::new("pin-galaxy", "ipod", MatchType::Exact)
            .include("2", 1)
            .exclude("1"),
    );

    let result = search(&coll, &q("ipod").enable_overrides(false));
    assert!(result.matched_overrides.is_empty());
    assert_eq!(ids(&result), vec!["1", "0", "3"]);
}

#[test]
fn every_matching_override_applies_in_id_order() {
    let coll = catalog();
    add(&coll, Override::new("b-hide", "ipod", MatchType::Contains).exclude("3"));
    add(&coll, Override::new("a-pin", "ipod", MatchType::Contains).include("4", 1));

    let result = search(&coll, &q("ipod"));
    assert_eq!(result.matched_overrides, vec!["a-pin", "b-hide"]);
    assert_eq!(ids(&result), vec!["4", "1", "0"]);
}

#[test]
fn override_crud() {
    let coll = catalog();
    add(&coll, Override::new("o1", "ipod", MatchType::Exact).exclude("1"));
    // Same id replaces
    add(&coll, Override::new("o1", "ipod", MatchType::Exact).exclude("0"));
    assert_eq!(coll.overrides().len(), 1);
    assert_eq!(ids(&search(&coll, &q("ipod"))), vec!["1", "3"]);

    coll.remove_override("o1").unwrap();
    assert!(coll.overrides().is_empty());
    assert!(matches!(coll.remove_override("o1"), Err(Error::NotFound(_))));
    assert_eq!(ids(&search(&coll, &q("ipod"))), vec!["1", "0", "3"]);
}

#[test]
fn invalid_override_is_rejected() {
    let coll = catalog();
    let err = coll
        .add_override(Override::new("bad", "ipod", MatchType::Exact).include("2", 0))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
    assert!(coll.overrides().is_empty());
}

// ============================================================================
// PER-QUERY PINS
// ============================================================================

#[test]
fn pinned_hits_are_not_repeated_in_ranked_results() {
    let coll = catalog();

    let result = search(&coll, &q("ipod").pin("0", 3));
    assert_eq!(ids(&result), vec!["1", "3", "0"]);
    assert_eq!(result.found, 3);
}

#[test]
fn pinned_and_hidden_hits() {
    let coll = catalog();

    let result = search(&coll, &q("ipod").pin("4", 1).hide("1"));
    assert_eq!(ids(&result), vec!["4", "0", "3"]);
}

#[test]
fn hidden_wins_over_pinned() {
    let coll = catalog();

    let result = search(&coll, &q("ipod").pin("1", 1).hide("1"));
    assert_eq!(ids(&result), vec!["0", "3"]);
}

#[test]
fn query_pins_take_precedence_over_override_pins() {
    let coll = catalog();
    add(&coll, Override::new("pin-galaxy", "ipod", MatchType::Exact).include("2", 1));

    let result = search(&coll, &q("ipod").pin("2", 3));
    assert_eq!(ids(&result), vec!["1", "0", "2", "3"]);
}

#[test]
fn unknown_pinned_ids_are_ignored() {
    let coll = catalog();

    let result = search(&coll, &q("ipod").pin("missing", 1).hide("also-missing"));
    assert_eq!(ids(&result), vec!["1", "0", "3"]);
}

#[test]
fn pins_count_towards_found_and_pages() {
    let coll = catalog();

    let result = search(&coll, &q("ipod").pin("4", 1).page(2, 2));
    assert_eq!(result.found, 4);
    assert_eq!(ids(&result), vec!["0", "3"]);
}

//! `filter_by`: numeric, boolean and text clauses joined with `&&`.

use super::common::{add_all, ids, make_collection, products_schema, search};
use ferret::{Collection, Error, SearchParams};
use serde_json::json;

fn products() -> std::sync::Arc<Collection> {
    let coll = make_collection(products_schema("products"));
    add_all(
        &coll,
        &[
            json!({"id": "p0", "title": "Wireless Mouse", "brand": "Acme", "price": 25.0,
                   "in_stock": true, "rating": 4, "tags": ["computer", "office"]}),
            json!({"id": "p1", "title": "Wireless Keyboard", "brand": "Globex", "price": 45.5,
                   "in_stock": false, "rating": 5, "tags": ["computer"]}),
            json!({"id": "p2", "title": "Wireless Charger", "brand": "Acme", "price": 15.0,
                   "in_stock": true, "rating": 3, "tags": ["phone"]}),
            json!({"id": "p3", "title": "Wired Mouse", "brand": "Initech", "price": 10.0,
                   "in_stock": true, "rating": 2}),
        ],
    );
    coll
}

fn wireless(filter: &str) -> SearchParams {
    SearchParams::new("wireless", &["title"]).filter(filter)
}

#[test]
fn numeric_comparators() {
    let coll = products();

    assert_eq!(ids(&search(&coll, &wireless("price:>20"))), vec!["p1", "p0"]);
    assert_eq!(ids(&search(&coll, &wireless("price:>=25"))), vec!["p1", "p0"]);
    assert_eq!(ids(&search(&coll, &wireless("price:<25"))), vec!["p2"]);
    assert_eq!(ids(&search(&coll, &wireless("price:<=25"))), vec!["p0", "p2"]);
    assert_eq!(ids(&search(&coll, &wireless("rating:5"))), vec!["p1"]);
    assert_eq!(ids(&search(&coll, &wireless("rating:=5"))), vec!["p1"]);
}

#[test]
fn bool_and_text_clauses() {
    let coll = products();

    assert_eq!(ids(&search(&coll, &wireless("in_stock:true"))), vec!["p0", "p2"]);
    assert_eq!(ids(&search(&coll, &wireless("in_stock: false"))), vec!["p1"]);
    // Text compares normalized
    assert_eq!(ids(&search(&coll, &wireless("brand:ACME"))), vec!["p0", "p2"]);
}

#[test]
fn clauses_are_conjunctive() {
    let coll = products();

    let result = search(&coll, &wireless("brand:acme && price:<20"));
    assert_eq!(ids(&result), vec!["p2"]);
    assert_eq!(result.found, 1);
}

#[test]
fn array_field_matches_any_element() {
    let coll = products();

    assert_eq!(ids(&search(&coll, &wireless("tags:computer"))), vec!["p1", "p0"]);
    // Missing optional field never matches
    assert_eq!(
        ids(&search(&coll, &SearchParams::new("mouse", &["title"]).filter("tags:office"))),
        vec!["p0"]
    );
}

#[test]
fn filter_on_wildcard_query() {
    let coll = products();

    let result = search(&coll, &SearchParams::new("*", &[]).filter("rating:>=3"));
    assert_eq!(ids(&result), vec!["p1", "p0", "p2"]);
    assert_eq!(result.out_of, 4);
}

#[test]
fn filtering_preserves_relative_order() {
    let coll = products();

    let all = ids(&search(&coll, &SearchParams::new("wireless", &["title"])));
    let filtered = ids(&search(&coll, &wireless("in_stock:true")));
    let expected: Vec<String> = all.into_iter().filter(|id| filtered.contains(id)).collect();
    assert_eq!(filtered, expected);
}

#[test]
fn filtered_out_documents_do_not_stop_dropping() {
    let coll = products();

    // The full query only finds p1, which is out of stock
    let result = search(
        &coll,
        &SearchParams::new("wireless keyboard", &["title"])
            .typos(0)
            .drop_tokens_threshold(1)
            .filter("in_stock:true"),
    );
    assert_eq!(ids(&result), vec!["p0", "p2"]);
}

#[test]
fn blank_filter_is_no_filter() {
    let coll = products();

    assert_eq!(search(&coll, &wireless("  ")).found, 3);
}

#[test]
fn invalid_filters_are_rejected() {
    let coll = products();

    for filter in [
        "colour:red",
        "price:cheap",
        "price",
        "brand:",
        "in_stock:maybe",
        "brand:>acme",
    ] {
        let err = coll.search(&wireless(filter)).unwrap_err();
        assert!(
            matches!(err, Error::InvalidParameter(_)),
            "{:?} gave {:?}",
            filter,
            err
        );
    }
}

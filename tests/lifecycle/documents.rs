//! Document add, get and remove.

use super::common::{make_collection, products_schema, titles_collection, titles_schema};
use ferret::{Error, SearchParams};
use serde_json::json;

fn doc_error(message: &str) -> Error {
    Error::DocumentValidation(message.into())
}

#[test]
fn id_must_be_a_string() {
    let coll = make_collection(titles_schema("coll1"));

    let err = coll
        .add(r#"{"id": 101010, "title": "Jeremy Howard", "points": 1}"#)
        .unwrap_err();
    assert_eq!(err, doc_error("Document's `id` field should be a string."));
    assert_eq!(err.status_code(), 400);

    let err = coll.add(r#"{"title": "Jeremy Howard", "points": 1}"#).unwrap_err();
    assert_eq!(err, doc_error("Document is missing the required `id` field."));
    assert_eq!(coll.num_documents(), 0);
}

#[test]
fn malformed_json_is_rejected() {
    let coll = make_collection(titles_schema("coll1"));

    let err = coll
        .add(r#"{"id": "0", "title": "不推荐。","points":10}","ratings":5}"#)
        .unwrap_err();
    assert_eq!(err, doc_error("Bad JSON."));

    let err = coll.add(r#"["not", "an", "object"]"#).unwrap_err();
    assert_eq!(err, doc_error("Bad JSON: not a properly formed document."));
    let err = coll.add_value(json!("just a string")).unwrap_err();
    assert_eq!(err, doc_error("Bad JSON: not a properly formed document."));
}

#[test]
fn required_fields_must_be_present_and_typed() {
    let coll = make_collection(titles_schema("coll1"));

    let err = coll.add_value(json!({"id": "0", "title": "Hello"})).unwrap_err();
    assert_eq!(
        err,
        doc_error("Field `points` has been declared in the schema, but is not found in the document.")
    );

    let err = coll
        .add_value(json!({"id": "0", "title": "Hello", "points": "ten"}))
        .unwrap_err();
    assert!(matches!(err, Error::DocumentValidation(_)));

    let err = coll
        .add_value(json!({"id": "0", "title": ["Hello"], "points": 1}))
        .unwrap_err();
    assert!(matches!(err, Error::DocumentValidation(_)));

    assert_eq!(coll.num_documents(), 0);
}

#[test]
fn optional_fields_may_be_absent() {
    let coll = make_collection(products_schema("products"));

    coll.add_value(json!({"id": "p0", "title": "Mouse", "brand": "Acme", "price": 9.5,
                          "in_stock": true, "rating": 3}))
        .unwrap();
    coll.add_value(json!({"id": "p1", "title": "Pad", "brand": "Acme", "price": 2,
                          "in_stock": false, "rating": 1, "description": null}))
        .unwrap();
    assert_eq!(coll.num_documents(), 2);

    let err = coll
        .add_value(json!({"id": "p2", "title": "Cable", "brand": "Acme", "price": 1.0,
                          "in_stock": true, "rating": 1, "tags": "usb"}))
        .unwrap_err();
    assert!(matches!(err, Error::DocumentValidation(_)));
}

#[test]
fn duplicate_ids_are_rejected() {
    let coll = titles_collection(&[("first", 1)]);

    let err = coll
        .add_value(json!({"id": "0", "title": "second", "points": 2}))
        .unwrap_err();
    assert_eq!(err, Error::Duplicate("A document with id 0 already exists.".into()));
    assert_eq!(err.status_code(), 409);
    assert_eq!(coll.get("0").unwrap()["title"], "first");
}

#[test]
fn get_and_remove_unknown_ids() {
    let coll = titles_collection(&[("first", 1)]);

    let expected = Error::NotFound("Could not find a document with id: 42".into());
    assert_eq!(coll.get("42").unwrap_err(), expected);
    assert_eq!(coll.remove("42").unwrap_err(), expected);
}

#[test]
fn remove_returns_the_document() {
    let coll = titles_collection(&[("first", 1), ("second", 2)]);

    let removed = coll.remove("1").unwrap();
    assert_eq!(removed, json!({"id": "1", "title": "second", "points": 2}));
    assert_eq!(coll.num_documents(), 1);
    assert!(coll.get("1").is_err());

    let result = coll.search(&SearchParams::new("second", &["title"])).unwrap();
    assert_eq!(result.found, 0);
    assert_eq!(result.out_of, 1);
}

#[test]
fn extra_fields_are_stored_verbatim() {
    let coll = make_collection(titles_schema("coll1"));
    let doc = json!({"id": "0", "title": "Hello", "points": 1,
                     "author": {"name": "Ann"}, "year": 1999});

    assert_eq!(coll.add_value(doc.clone()).unwrap(), "0");
    assert_eq!(coll.get("0").unwrap(), doc);
}

#[test]
fn add_accepts_raw_json() {
    let coll = make_collection(titles_schema("coll1"));

    let id = coll
        .add(r#"{"id": "abc", "title": "The quick brown fox", "points": 7}"#)
        .unwrap();
    assert_eq!(id, "abc");
    assert_eq!(coll.get("abc").unwrap()["points"], 7);
}

//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use ferret::{Collection, CollectionSchema, Field, FieldType, SearchParams, SearchResult};
use serde_json::Value;

// Re-export canonical test utilities from ferret::testing
pub use ferret::testing::{
    add_all, make_collection, make_manager, products_schema, title_docs, titles_collection,
    titles_schema, FailingStore,
};

// ============================================================================
// SCHEMAS
// ============================================================================

/// `points`-sorted schema with the given string fields.
pub fn text_schema(name: &str, fields: &[&str]) -> CollectionSchema {
    let mut all: Vec<Field> = fields
        .iter()
        .map(|f| Field::new(*f, FieldType::String))
        .collect();
    all.push(Field::new("points", FieldType::Int32));
    CollectionSchema::new(name, all).with_sorting_field("points")
}

/// A collection over `text_schema` holding `docs`.
pub fn collection_with(fields: &[&str], docs: &[Value]) -> Arc<Collection> {
    let coll = make_collection(text_schema("coll1", fields));
    add_all(&coll, docs);
    coll
}

// ============================================================================
// RESULT HELPERS
// ============================================================================

pub fn search(coll: &Collection, params: &SearchParams) -> SearchResult {
    match coll.search(params) {
        Ok(result) => result,
        Err(err) => panic!("search {:?} failed: {}", params.q, err),
    }
}

pub fn ids(result: &SearchResult) -> Vec<String> {
    result.ids().into_iter().map(str::to_string).collect()
}

/// Snippet of `field` in the `hit`-th hit.
pub fn snippet(result: &SearchResult, hit: usize, field: &str) -> Option<String> {
    result.hits[hit]
        .highlights
        .iter()
        .find(|h| h.field == field)
        .map(|h| h.snippet.clone())
}

pub fn highlighted_fields(result: &SearchResult, hit: usize) -> Vec<String> {
    result.hits[hit]
        .highlights
        .iter()
        .map(|h| h.field.clone())
        .collect()
}

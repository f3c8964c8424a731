// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit tests, integration tests, benches and
//! fuzz targets.
//!
//! This module is always compiled but hidden from documentation.

#![doc(hidden)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::manager::CollectionManager;
use crate::store::{MemoryStore, Store};
use crate::types::{CollectionSchema, Field, FieldType};

/// `title: string`, `points: int32`, sorted by `points`.
pub fn titles_schema(name: &str) -> CollectionSchema {
    CollectionSchema::new(
        name,
        vec![
            Field::new("title", FieldType::String),
            Field::new("points", FieldType::Int32),
        ],
    )
    .with_sorting_field("points")
}

/// `title`, `description`, `tags[]`, `brand` (facet), `price`, `in_stock`,
/// `rating` (sorting field).
pub fn products_schema(name: &str) -> CollectionSchema {
    CollectionSchema::new(
        name,
        vec![
            Field::new("title", FieldType::String),
            Field::new("description", FieldType::String).optional(),
            Field::new("tags", FieldType::StringArray).optional(),
            Field::new("brand", FieldType::String).facet(),
            Field::new("price", FieldType::Float),
            Field::new("in_stock", FieldType::Bool),
            Field::new("rating", FieldType::Int32),
        ],
    )
    .with_sorting_field("rating")
}

/// A fresh manager over a fresh in-memory store.
pub fn make_manager() -> (Arc<MemoryStore>, CollectionManager) {
    let store = Arc::new(MemoryStore::new());
    let manager = CollectionManager::new(store.clone());
    (store, manager)
}

/// Create `schema` in a throwaway manager.
pub fn make_collection(schema: CollectionSchema) -> Arc<Collection> {
    let (_, manager) = make_manager();
    match manager.create_collection(schema) {
        Ok(collection) => collection,
        Err(err) => panic!("fixture schema rejected: {}", err),
    }
}

/// Add every document, panicking on the first rejection.
pub fn add_all(collection: &Collection, documents: &[Value]) {
    for doc in documents {
        if let Err(err) = collection.add_value(doc.clone()) {
            panic!("fixture document {} rejected: {}", doc, err);
        }
    }
}

/// `titles_schema` documents with ids `"0"`, `"1"`, ... in order.
pub fn title_docs(titles: &[(&str, i64)]) -> Vec<Value> {
    titles
        .iter()
        .enumerate()
        .map(|(i, (title, points))| json!({"id": i.to_string(), "title": title, "points": points}))
        .collect()
}

/// A `titles_schema` collection holding `titles`.
pub fn titles_collection(titles: &[(&str, i64)]) -> Arc<Collection> {
    let collection = make_collection(titles_schema("coll1"));
    add_all(&collection, &title_docs(titles));
    collection
}

/// Store whose writes fail once `fail_writes` is set. Reads always succeed.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::Persistence("disk full".into()))
        } else {
            Ok(())
        }
    }
}

impl Store for FailingStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.inner.put(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.delete(key)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        self.inner.scan_prefix(prefix)
    }

    fn delete_prefix(&self, prefix: &str) -> Result<usize> {
        self.check()?;
        self.inner.delete_prefix(prefix)
    }
}

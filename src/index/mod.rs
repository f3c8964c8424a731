// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction: one inverted index per searchable field.
//!
//! Fields are indexed independently so that weights, typo budgets and prefix
//! flags can differ per field, and so that a match in `title` is never confused
//! with a match in `description`. Non-text and unindexed fields have no slot
//! here; they're still stored and returned with the document.

mod inverted;

pub use inverted::*;

use serde_json::Value;

use crate::tokenizer::{Token, Tokenizer};
use crate::types::{CollectionSchema, SeqId};

/// The searchable part of a collection.
#[derive(Debug, Clone, Default)]
pub struct Index {
    /// Aligned with the schema's fields; `None` for fields that aren't searchable.
    fields: Vec<Option<FieldIndex>>,
}

impl Index {
    pub fn new(schema: &CollectionSchema) -> Self {
        Self {
            fields: schema
                .fields
                .iter()
                .map(|f| f.is_searchable().then(FieldIndex::new))
                .collect(),
        }
    }

    /// Index of the schema field at `field`, if it is searchable.
    pub fn field(&self, field: usize) -> Option<&FieldIndex> {
        self.fields.get(field).and_then(Option::as_ref)
    }

    /// Index every searchable field of a validated document.
    pub fn insert(&mut self, seq: SeqId, document: &Value, schema: &CollectionSchema, tokenizer: &Tokenizer) {
        for (field, index) in schema.fields.iter().zip(self.fields.iter_mut()) {
            let Some(index) = index else { continue };
            let elements = field_elements(document.get(&field.name), tokenizer);
            index.insert(seq, &elements);
        }
    }

    pub fn remove(&mut self, seq: SeqId) {
        for index in self.fields.iter_mut().flatten() {
            index.remove(seq);
        }
    }
}

/// Token lists of a text value: one per array element, or one for a string.
/// Missing, null and non-text values yield nothing.
pub fn field_elements(value: Option<&Value>, tokenizer: &Tokenizer) -> Vec<Vec<Token>> {
    match value {
        Some(Value::String(s)) => vec![tokenizer.tokenize(s)],
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => tokenizer.tokenize(s),
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

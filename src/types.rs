// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a collection and of a search response.
//!
//! Schema types are serde-friendly because they're persisted as collection
//! metadata and read back on startup. Field types serialize the way users
//! write them in a schema: `"string"`, `"int32"`, `"string[]"`, ...
//!
//! # Invariants
//!
//! - **SeqId**: assigned once per document in insertion order, never reused
//!   within a collection's lifetime. Ranking falls back to it, so equal scores
//!   keep insertion order.
//! - **Field**: immutable after the collection is created.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tokenizer::TokenizerConfig;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Internal insertion sequence number of a document.
///
/// Distinct from the user-facing string `id`. Postings and ranking use this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SeqId(pub u32);

impl SeqId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for SeqId {
    fn from(id: u32) -> Self {
        SeqId(id)
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

/// Type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "string[]")]
    StringArray,
    #[serde(rename = "int32[]")]
    Int32Array,
    #[serde(rename = "int64[]")]
    Int64Array,
    #[serde(rename = "float[]")]
    FloatArray,
    #[serde(rename = "bool[]")]
    BoolArray,
}

impl FieldType {
    pub fn is_array(self) -> bool {
        matches!(
            self,
            FieldType::StringArray
                | FieldType::Int32Array
                | FieldType::Int64Array
                | FieldType::FloatArray
                | FieldType::BoolArray
        )
    }

    /// Text fields are the only ones that get tokenized and searched.
    pub fn is_text(self) -> bool {
        matches!(self, FieldType::String | FieldType::StringArray)
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self.element(),
            FieldType::Int32 | FieldType::Int64 | FieldType::Float
        )
    }

    /// Scalar type of an array's elements; scalars map to themselves.
    pub fn element(self) -> FieldType {
        match self {
            FieldType::StringArray => FieldType::String,
            FieldType::Int32Array => FieldType::Int32,
            FieldType::Int64Array => FieldType::Int64,
            FieldType::FloatArray => FieldType::Float,
            FieldType::BoolArray => FieldType::Bool,
            scalar => scalar,
        }
    }

    /// Schema spelling, for error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::StringArray => "string[]",
            FieldType::Int32Array => "int32[]",
            FieldType::Int64Array => "int64[]",
            FieldType::FloatArray => "float[]",
            FieldType::BoolArray => "bool[]",
        }
    }

    /// Does a JSON value fit this type?
    pub fn accepts(self, value: &Value) -> bool {
        if self.is_array() {
            return match value {
                Value::Array(items) => items.iter().all(|v| self.element().accepts(v)),
                _ => false,
            };
        }
        match self {
            FieldType::String => value.is_string(),
            FieldType::Int32 => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            FieldType::Int64 => value.as_i64().is_some(),
            FieldType::Float => value.is_number(),
            FieldType::Bool => value.is_boolean(),
            _ => false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub facet: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default = "default_true")]
    pub index: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            facet: false,
            optional: false,
            index: true,
        }
    }

    pub fn facet(mut self) -> Self {
        self.facet = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Stored and returned, never indexed.
    pub fn unindexed(mut self) -> Self {
        self.index = false;
        self
    }

    /// Indexed text field: a candidate for `query_by`.
    pub fn is_searchable(&self) -> bool {
        self.index && self.field_type.is_text()
    }
}

/// Everything needed to create a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sorting_field: Option<String>,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            default_sorting_field: None,
            tokenizer: TokenizerConfig::default(),
        }
    }

    pub fn with_sorting_field(mut self, field: impl Into<String>) -> Self {
        self.default_sorting_field = Some(field.into());
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

// =============================================================================
// SEARCH RESPONSE
// =============================================================================

/// Highlight of one field of one hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub field: String,
    /// Window around the best matches, or the whole field when it is short.
    pub snippet: String,
    /// Whole field value with every match marked. Only for full-highlight fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Original words that were marked, in field order.
    pub matched_tokens: Vec<String>,
    /// Array fields only: indices of the elements that matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub document: Value,
    pub highlights: Vec<Highlight>,
    pub text_match: u64,
    pub fields_matched: u32,
}

impl Hit {
    /// The document's `id`, or "" when the projection dropped it.
    pub fn id(&self) -> &str {
        self.document.get("id").and_then(Value::as_str).unwrap_or("")
    }
}

/// Everything a search returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching documents after filtering and hiding, before pagination.
    pub found: usize,
    /// Documents in the collection.
    pub out_of: usize,
    pub page: u32,
    pub hits: Vec<Hit>,
    /// Ids of the overrides that fired, in evaluation order.
    pub matched_overrides: Vec<String>,
}

impl SearchResult {
    pub fn ids(&self) -> Vec<&str> {
        self.hits.iter().map(Hit::id).collect()
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document parsing and validation.
//!
//! Validation runs to completion before anything is indexed or persisted, so a
//! rejected document leaves no trace.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::schema::ID_FIELD;
use crate::error::{Error, Result};
use crate::types::{CollectionSchema, SeqId};

/// A document as persisted: the caller's JSON plus its sequence id, so that
/// insertion order survives a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub seq_id: SeqId,
    pub document: Value,
}

/// Parse `json` into an object. Anything else is a validation error.
pub fn parse_document(json: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::DocumentValidation(
            "Bad JSON: not a properly formed document.".into(),
        )),
        Err(_) => Err(Error::DocumentValidation("Bad JSON.".into())),
    }
}

/// Check a parsed document against the schema and return its `id`.
pub fn validate_document(document: &Map<String, Value>, schema: &CollectionSchema) -> Result<String> {
    let id = match document.get(ID_FIELD) {
        None => {
            return Err(Error::DocumentValidation(
                "Document is missing the required `id` field.".into(),
            ))
        }
        Some(Value::String(id)) => id.clone(),
        Some(_) => {
            return Err(Error::DocumentValidation(
                "Document's `id` field should be a string.".into(),
            ))
        }
    };
    if id.is_empty() {
        return Err(Error::DocumentValidation(
            "Document's `id` field should not be empty.".into(),
        ));
    }

    for field in &schema.fields {
        match document.get(&field.name) {
            None | Some(Value::Null) => {
                if !field.optional {
                    return Err(Error::DocumentValidation(format!(
                        "Field `{}` has been declared in the schema, but is not found in the document.",
                        field.name
                    )));
                }
            }
            Some(value) => {
                if !field.field_type.accepts(value) {
                    return Err(Error::DocumentValidation(format!(
                        "Field `{}` must be of type `{}`.",
                        field.name,
                        field.field_type.as_str()
                    )));
                }
            }
        }
    }

    Ok(id)
}

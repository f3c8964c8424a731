// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Schema validation at collection creation.

use std::collections::HashSet;

use tracing::warn;

use crate::error::{Error, Result};
use crate::types::CollectionSchema;

/// Reserved document identifier. Never a schema field.
pub const ID_FIELD: &str = "id";

/// Check a schema and return the form the collection keeps.
///
/// A field literally named `id` is dropped: the identifier is reserved and
/// always a string.
pub fn validate_schema(mut schema: CollectionSchema) -> Result<CollectionSchema> {
    if schema.name.trim().is_empty() {
        return Err(Error::SchemaValidation(
            "Collection name must not be empty.".into(),
        ));
    }
    if schema.name.contains('/') {
        return Err(Error::SchemaValidation(format!(
            "Collection name `{}` must not contain `/`.",
            schema.name
        )));
    }

    if schema.fields.iter().any(|f| f.name == ID_FIELD) {
        warn!(collection = %schema.name, "ignoring `id` field in schema");
        schema.fields.retain(|f| f.name != ID_FIELD);
    }

    let mut seen = HashSet::new();
    for field in &schema.fields {
        if field.name.trim().is_empty() {
            return Err(Error::SchemaValidation(
                "Field names must not be empty.".into(),
            ));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(Error::SchemaValidation(format!(
                "There are duplicate field names in the schema: `{}`.",
                field.name
            )));
        }
    }

    if let Some(sorting) = &schema.default_sorting_field {
        let Some(field) = schema.field(sorting) else {
            return Err(Error::SchemaValidation(format!(
                "Default sorting field is defined as `{}` but is not found in the schema.",
                sorting
            )));
        };
        if field.field_type.is_array() || !field.field_type.is_numeric() {
            return Err(Error::SchemaValidation(format!(
                "Default sorting field `{}` must be a single valued numerical field.",
                sorting
            )));
        }
        if field.optional {
            return Err(Error::SchemaValidation(format!(
                "Default sorting field `{}` cannot be an optional field.",
                sorting
            )));
        }
    }

    Ok(schema)
}

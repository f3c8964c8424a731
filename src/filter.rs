// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A minimal conjunctive filter.
//!
//! ```text
//! points:>10 && in_stock:true && brand:Acme
//! ```
//!
//! Each clause is `field:value` with an optional comparator after the colon:
//! `=`, `>`, `>=`, `<`, `<=`. Clauses are joined with `&&`; there is no `||`
//! and no grouping. Strings compare on their normalized form, so `brand:ACME`
//! matches "Acme". For array fields a clause holds if any element satisfies it.
//!
//! Filters restrict the candidate set. They never change scores, so filtered
//! results keep their relative order.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::tokenizer::Tokenizer;
use crate::types::{CollectionSchema, FieldType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(f64),
    Bool(bool),
    /// Normalized text.
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: String,
    pub comparator: Comparator,
    pub value: FilterValue,
}

/// A parsed filter, validated against a schema.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
    tokenizer: Tokenizer,
}

impl Filter {
    pub fn parse(expr: &str, schema: &CollectionSchema, tokenizer: &Tokenizer) -> Result<Self> {
        let mut clauses = Vec::new();
        for raw in expr.split("&&") {
            clauses.push(parse_clause(raw.trim(), schema, tokenizer)?);
        }
        Ok(Self {
            clauses,
            tokenizer: tokenizer.clone(),
        })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Does the document satisfy every clause?
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses.iter().all(|clause| match document.get(&clause.field) {
            Some(Value::Array(items)) => items.iter().any(|v| self.clause_holds(clause, v)),
            Some(value) => self.clause_holds(clause, value),
            None => false,
        })
    }

    fn clause_holds(&self, clause: &Clause, value: &Value) -> bool {
        match &clause.value {
            FilterValue::Number(target) => {
                let Some(actual) = value.as_f64() else {
                    return false;
                };
                match clause.comparator {
                    Comparator::Eq => actual == *target,
                    Comparator::Gt => actual > *target,
                    Comparator::Gte => actual >= *target,
                    Comparator::Lt => actual < *target,
                    Comparator::Lte => actual <= *target,
                }
            }
            FilterValue::Bool(target) => value.as_bool() == Some(*target),
            FilterValue::Text(target) => value
                .as_str()
                .is_some_and(|s| self.tokenizer.normalize_query(s) == *target),
        }
    }
}

fn parse_clause(raw: &str, schema: &CollectionSchema, tokenizer: &Tokenizer) -> Result<Clause> {
    let Some((field, rest)) = raw.split_once(':') else {
        return Err(Error::InvalidParameter(format!(
            "Could not parse the filter query: `{}`.",
            raw
        )));
    };
    let field = field.trim();
    let Some(schema_field) = schema.field(field) else {
        return Err(Error::InvalidParameter(format!(
            "Could not find a filter field named `{}` in the schema.",
            field
        )));
    };

    let rest = rest.trim_start();
    let (comparator, value) = [
        (">=", Comparator::Gte),
        ("<=", Comparator::Lte),
        (">", Comparator::Gt),
        ("<", Comparator::Lt),
        ("=", Comparator::Eq),
    ]
    .iter()
    .find_map(|(op, cmp)| rest.strip_prefix(*op).map(|v| (*cmp, v)))
    .unwrap_or((Comparator::Eq, rest));

    let value = value.trim().trim_matches('`');
    if value.is_empty() {
        return Err(Error::InvalidParameter(format!(
            "Filter on field `{}` has no value.",
            field
        )));
    }

    let value = match schema_field.field_type.element() {
        FieldType::Int32 | FieldType::Int64 | FieldType::Float => {
            let n: f64 = value.parse().map_err(|_| {
                Error::InvalidParameter(format!(
                    "Value of filter field `{}` must be a number.",
                    field
                ))
            })?;
            FilterValue::Number(n)
        }
        FieldType::Bool => match value {
            "true" => FilterValue::Bool(true),
            "false" => FilterValue::Bool(false),
            _ => {
                return Err(Error::InvalidParameter(format!(
                    "Value of filter field `{}` must be `true` or `false`.",
                    field
                )))
            }
        },
        _ => FilterValue::Text(tokenizer.normalize_query(value)),
    };

    if comparator != Comparator::Eq && !matches!(value, FilterValue::Number(_)) {
        return Err(Error::InvalidParameter(format!(
            "Range comparisons need a numeric field; `{}` is not one.",
            field
        )));
    }

    Ok(Clause {
        field: field.to_string(),
        comparator,
        value,
    })
}

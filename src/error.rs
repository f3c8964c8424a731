// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for collection, document and search operations.
//!
//! Matching, scoring and highlighting never fail: an empty hit list is a valid
//! answer. Everything that can go wrong happens at the edges: a schema that
//! doesn't make sense, a document that doesn't fit the schema, a search that
//! names fields the collection doesn't have, or the store underneath giving up.
//!
//! Messages are meant for humans and are returned verbatim to callers, so they
//! name the offending field or value.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the search core reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bad or missing field type, bad sorting field, bad collection name.
    #[error("{0}")]
    SchemaValidation(String),

    /// Malformed JSON, non-string id, missing or mistyped field.
    #[error("{0}")]
    DocumentValidation(String),

    /// Collection, document, field, override or synonym is absent.
    #[error("{0}")]
    NotFound(String),

    /// Collection name or document id already taken.
    #[error("{0}")]
    Duplicate(String),

    /// Search parameters that can't be honoured (weights vs fields, typo
    /// budget out of range, unparsable filter, page zero).
    #[error("{0}")]
    InvalidParameter(String),

    /// The store failed. Propagated as-is; retrying is the store's business.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl Error {
    /// HTTP-style status code for callers that sit behind a REST layer.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::SchemaValidation(_)
            | Error::DocumentValidation(_)
            | Error::InvalidParameter(_) => 400,
            Error::NotFound(_) => 404,
            Error::Duplicate(_) => 409,
            Error::Persistence(_) => 500,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(format!("corrupt record: {}", err))
    }
}

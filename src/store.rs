// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Durable key-value persistence, as the search core sees it.
//!
//! The core never owns a storage engine. It writes string keys and JSON string
//! values through [`Store`] and reads them back on startup. Key layout:
//!
//! ```text
//! $CN                       next collection id
//! $CM_<name>                collection metadata (id + schema)
//! $DC_<collection id>/<id>  document JSON
//! $CO_<name>/<override id>  override JSON
//! $CY_<name>/<synonym id>   synonym JSON
//! ```
//!
//! Document keys use the numeric collection id, so a collection recreated under
//! an old name never sees the previous incarnation's documents.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::Result;

pub const NEXT_COLLECTION_ID_KEY: &str = "$CN";
pub const COLLECTION_META_PREFIX: &str = "$CM_";
pub const DOCUMENT_PREFIX: &str = "$DC_";
pub const OVERRIDE_PREFIX: &str = "$CO_";
pub const SYNONYM_PREFIX: &str = "$CY_";

pub fn collection_meta_key(name: &str) -> String {
    format!("{}{}", COLLECTION_META_PREFIX, name)
}

/// Prefix of every document key of a collection, trailing slash included.
pub fn document_prefix(collection_id: u32) -> String {
    format!("{}{}/", DOCUMENT_PREFIX, collection_id)
}

pub fn document_key(collection_id: u32, doc_id: &str) -> String {
    format!("{}{}", document_prefix(collection_id), doc_id)
}

pub fn override_prefix(collection: &str) -> String {
    format!("{}{}/", OVERRIDE_PREFIX, collection)
}

pub fn override_key(collection: &str, id: &str) -> String {
    format!("{}{}", override_prefix(collection), id)
}

pub fn synonym_prefix(collection: &str) -> String {
    format!("{}{}/", SYNONYM_PREFIX, collection)
}

pub fn synonym_key(collection: &str, id: &str) -> String {
    format!("{}{}", synonym_prefix(collection), id)
}

/// Key-value persistence. Implementations must be safe to share across threads.
///
/// Failures surface as [`crate::Error::Persistence`] and are propagated
/// unchanged by every caller.
pub trait Store: Send + Sync {
    fn put(&self, key: &str, value: &str) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Values of every key starting with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Delete every key starting with `prefix`. Returns how many went.
    fn delete_prefix(&self, prefix: &str) -> Result<usize>;
}

/// In-memory [`Store`]: an ordered map behind a lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Keys starting with `prefix`, for inspection in tests and the CLI.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .read()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl Store for MemoryStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .read()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn delete_prefix(&self, prefix: &str) -> Result<usize> {
        let keys = self.keys_with_prefix(prefix);
        let mut entries = self.entries.write();
        for key in &keys {
            entries.remove(key);
        }
        Ok(keys.len())
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Collection registry: name → live collection, plus the store bookkeeping
//! that lets the registry come back after a restart.
//!
//! Each collection gets a numeric id from a persisted counter (`$CN`). Its
//! metadata (`$CM_<name>`) records that id and the schema, which is all
//! [`CollectionManager::load`] needs to rebuild it from its document,
//! override and synonym records.
//!
//! Create and drop mutate the registry under its write lock, so a concurrent
//! `get_collection` sees either the old state or the new one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collection::{validate_schema, Collection};
use crate::error::{Error, Result};
use crate::store::{self, Store};
use crate::types::CollectionSchema;

/// What `$CM_<name>` holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionMeta {
    id: u32,
    schema: CollectionSchema,
}

pub struct CollectionManager {
    store: Arc<dyn Store>,
    collections: RwLock<HashMap<String, Arc<Collection>>>,
    next_collection_id: AtomicU32,
}

impl std::fmt::Debug for CollectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionManager")
            .field("collections", &self.collection_names())
            .field("next_collection_id", &self.next_collection_id.load(Ordering::Acquire))
            .finish()
    }
}

impl CollectionManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            collections: RwLock::new(HashMap::new()),
            next_collection_id: AtomicU32::new(0),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Rebuild every persisted collection. Replaces whatever the registry
    /// held. Returns how many collections were restored.
    pub fn load(&self) -> Result<usize> {
        let mut collections = self.collections.write();
        collections.clear();

        let mut next_id = match self.store.get(store::NEXT_COLLECTION_ID_KEY)? {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                Error::Persistence(format!("corrupt collection id counter `{}`: {}", raw, e))
            })?,
            None => 0,
        };

        for raw in self.store.scan_prefix(store::COLLECTION_META_PREFIX)? {
            let meta: CollectionMeta = match serde_json::from_str(&raw) {
                Ok(meta) => meta,
                Err(err) => {
                    warn!(%err, "skipping corrupt collection metadata");
                    continue;
                }
            };
            let name = meta.schema.name.clone();
            let collection = Collection::restore(meta.id, meta.schema, Arc::clone(&self.store))?;
            info!(
                collection = %name,
                id = meta.id,
                documents = collection.num_documents(),
                "loaded collection"
            );
            next_id = next_id.max(meta.id + 1);
            collections.insert(name, Arc::new(collection));
        }

        self.next_collection_id.store(next_id, Ordering::Release);
        info!(collections = collections.len(), "collection manager loaded");
        Ok(collections.len())
    }

    /// Forget every in-memory collection. The store is untouched.
    pub fn dispose(&self) {
        self.collections.write().clear();
    }

    pub fn create_collection(&self, schema: CollectionSchema) -> Result<Arc<Collection>> {
        let schema = validate_schema(schema)?;

        let mut collections = self.collections.write();
        if collections.contains_key(&schema.name) {
            return Err(Error::Duplicate(format!(
                "A collection with name `{}` already exists.",
                schema.name
            )));
        }

        let id = self.next_collection_id.load(Ordering::Acquire);
        let meta = CollectionMeta {
            id,
            schema: schema.clone(),
        };
        let raw = serde_json::to_string(&meta).map_err(|e| Error::Persistence(e.to_string()))?;
        self.store
            .put(store::NEXT_COLLECTION_ID_KEY, &(id + 1).to_string())?;
        self.store.put(&store::collection_meta_key(&schema.name), &raw)?;
        self.next_collection_id.store(id + 1, Ordering::Release);

        let collection = Arc::new(Collection::new(id, schema, Arc::clone(&self.store)));
        collections.insert(collection.name().to_string(), Arc::clone(&collection));
        info!(collection = %collection.name(), id, "created collection");
        Ok(collection)
    }

    pub fn get_collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.collections.read().get(name).cloned()
    }

    /// Sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop `name`. Handles still held elsewhere keep reading but can no
    /// longer write. Returns `false` when no such collection existed.
    pub fn drop_collection(&self, name: &str, remove_persisted_docs: bool) -> Result<bool> {
        let mut collections = self.collections.write();
        let Some(collection) = collections.get(name).cloned() else {
            return Ok(false);
        };

        self.store.delete(&store::collection_meta_key(name))?;
        collections.remove(name);
        collection.mark_dropped();

        self.store.delete_prefix(&store::override_prefix(name))?;
        self.store.delete_prefix(&store::synonym_prefix(name))?;
        if remove_persisted_docs {
            let removed = self
                .store
                .delete_prefix(&store::document_prefix(collection.id()))?;
            info!(collection = %name, documents = removed, "removed persisted documents");
        }

        info!(collection = %name, id = collection.id(), "dropped collection");
        Ok(true)
    }
}

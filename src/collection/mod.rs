// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A collection: schema, documents, index and rules behind one handle.
//!
//! # Locking
//!
//! Two reader-writer locks:
//!
//! - `state` guards the index and the documents. Searches hold the read lock
//!   for their whole run; `add`/`remove` hold the write lock for the mutation.
//! - `rules` guards overrides and synonyms. Searches take it only to resolve
//!   the query.
//!
//! Writes persist first and mutate memory second, so a store failure leaves
//! both untouched.
//!
//! # Dropping
//!
//! The manager marks a collection dropped while holding both write locks.
//! Every write checks the flag under its lock, so once `drop_collection`
//! returns, handles that are still around can read but never write.

mod document;
mod schema;

pub use document::{parse_document, validate_document, StoredDocument};
pub use schema::{validate_schema, ID_FIELD};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::fuzzy::MAX_TYPOS;
use crate::highlight::{HighlightField, HighlightOptions, Highlighter};
use crate::index::Index;
use crate::rules::{Override, Resolution, RuleSet, Synonym};
use crate::scoring::{rank, text_match, ScoredDocument};
use crate::search::params::{default_weight, MAX_PER_PAGE};
use crate::search::{match_all, FieldMatch, Matcher, Planner, SearchField, SearchParams};
use crate::store::{self, Store};
use crate::tokenizer::Tokenizer;
use crate::types::{CollectionSchema, Hit, SearchResult, SeqId};

#[derive(Debug, Default)]
struct State {
    index: Index,
    documents: BTreeMap<SeqId, Value>,
    ids: HashMap<String, SeqId>,
    next_seq: u32,
}

/// Size of one field's inverted index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStats {
    pub name: String,
    pub vocabulary: usize,
    pub documents: usize,
}

/// A searched field, resolved against the schema.
#[derive(Debug, Clone)]
struct QueryField {
    schema_idx: usize,
    name: String,
    num_typos: u32,
    prefix: bool,
    weight: u32,
}

pub struct Collection {
    id: u32,
    schema: CollectionSchema,
    tokenizer: Tokenizer,
    store: Arc<dyn Store>,
    state: RwLock<State>,
    rules: RwLock<RuleSet>,
    dropped: AtomicBool,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.schema.name)
            .field("id", &self.id)
            .field("num_documents", &self.num_documents())
            .field("dropped", &self.is_dropped())
            .finish()
    }
}

impl Collection {
    /// An empty collection. The schema must already be validated.
    pub fn new(id: u32, schema: CollectionSchema, store: Arc<dyn Store>) -> Self {
        let tokenizer = Tokenizer::new(schema.tokenizer.clone());
        let state = State {
            index: Index::new(&schema),
            ..State::default()
        };
        Self {
            id,
            schema,
            tokenizer,
            store,
            state: RwLock::new(state),
            rules: RwLock::new(RuleSet::new()),
            dropped: AtomicBool::new(false),
        }
    }

    /// Rebuild a collection from its persisted documents, overrides and
    /// synonyms. Corrupt records are logged and skipped.
    pub fn restore(id: u32, schema: CollectionSchema, store: Arc<dyn Store>) -> Result<Self> {
        let collection = Self::new(id, schema, store);

        {
            let mut state = collection.state.write();
            let mut records: Vec<StoredDocument> = Vec::new();
            for raw in collection.store.scan_prefix(&store::document_prefix(id))? {
                match serde_json::from_str::<StoredDocument>(&raw) {
                    Ok(record) => records.push(record),
                    Err(err) => warn!(collection = %collection.name(), %err, "skipping corrupt document record"),
                }
            }
            records.sort_by_key(|r| r.seq_id);
            for record in records {
                let Some(doc_id) = record.document.get(ID_FIELD).and_then(Value::as_str) else {
                    warn!(collection = %collection.name(), "skipping stored document without id");
                    continue;
                };
                let doc_id = doc_id.to_string();
                collection.apply_insert(&mut state, record.seq_id, doc_id, record.document);
            }
        }

        {
            let mut rules = collection.rules.write();
            for raw in collection.store.scan_prefix(&store::override_prefix(collection.name()))? {
                match serde_json::from_str::<Override>(&raw) {
                    Ok(ov) => rules.upsert_override(ov),
                    Err(err) => warn!(collection = %collection.name(), %err, "skipping corrupt override"),
                }
            }
            for raw in collection.store.scan_prefix(&store::synonym_prefix(collection.name()))? {
                match serde_json::from_str::<Synonym>(&raw) {
                    Ok(synonym) => rules.upsert_synonym(synonym),
                    Err(err) => warn!(collection = %collection.name(), %err, "skipping corrupt synonym"),
                }
            }
        }

        Ok(collection)
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn num_documents(&self) -> usize {
        self.state.read().documents.len()
    }

    /// Index sizes of the searchable fields, in schema order.
    pub fn field_stats(&self) -> Vec<FieldStats> {
        let state = self.state.read();
        self.schema
            .fields
            .iter()
            .enumerate()
            .filter_map(|(i, field)| {
                state.index.field(i).map(|index| FieldStats {
                    name: field.name.clone(),
                    vocabulary: index.vocabulary_len(),
                    documents: index.num_documents(),
                })
            })
            .collect()
    }

    pub fn is_dropped(&self) -> bool {
        self.dropped.load(Ordering::Acquire)
    }

    /// Refuse further writes. Called by the manager on drop.
    pub(crate) fn mark_dropped(&self) {
        let _state = self.state.write();
        let _rules = self.rules.write();
        self.dropped.store(true, Ordering::Release);
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_dropped() {
            return Err(Error::NotFound(format!(
                "No collection with name `{}` found.",
                self.name()
            )));
        }
        Ok(())
    }

    // =========================================================================
    // DOCUMENTS
    // =========================================================================

    /// Validate, persist and index a JSON document. Returns its `id`.
    pub fn add(&self, json: &str) -> Result<String> {
        let map = parse_document(json)?;
        self.add_object(map)
    }

    /// Same as [`Collection::add`] for an already parsed document.
    pub fn add_value(&self, document: Value) -> Result<String> {
        match document {
            Value::Object(map) => self.add_object(map),
            _ => Err(Error::DocumentValidation(
                "Bad JSON: not a properly formed document.".into(),
            )),
        }
    }

    fn add_object(&self, map: Map<String, Value>) -> Result<String> {
        let doc_id = validate_document(&map, &self.schema)?;
        let document = Value::Object(map);

        let mut state = self.state.write();
        self.ensure_live()?;
        if state.ids.contains_key(&doc_id) {
            return Err(Error::Duplicate(format!(
                "A document with id {} already exists.",
                doc_id
            )));
        }

        let seq = SeqId(state.next_seq);
        let record = StoredDocument {
            seq_id: seq,
            document,
        };
        let raw = serde_json::to_string(&record).map_err(|e| Error::Persistence(e.to_string()))?;
        self.store.put(&store::document_key(self.id, &doc_id), &raw)?;

        self.apply_insert(&mut state, seq, doc_id.clone(), record.document);
        Ok(doc_id)
    }

    fn apply_insert(&self, state: &mut State, seq: SeqId, doc_id: String, document: Value) {
        state.index.insert(seq, &document, &self.schema, &self.tokenizer);
        state.documents.insert(seq, document);
        state.ids.insert(doc_id, seq);
        state.next_seq = state.next_seq.max(seq.get() + 1);
    }

    pub fn get(&self, id: &str) -> Result<Value> {
        let state = self.state.read();
        state
            .ids
            .get(id)
            .and_then(|seq| state.documents.get(seq))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Could not find a document with id: {}", id)))
    }

    /// Remove a document from the index and the store. Returns it.
    pub fn remove(&self, id: &str) -> Result<Value> {
        let mut state = self.state.write();
        self.ensure_live()?;
        let Some(&seq) = state.ids.get(id) else {
            return Err(Error::NotFound(format!(
                "Could not find a document with id: {}",
                id
            )));
        };

        self.store.delete(&store::document_key(self.id, id))?;

        state.index.remove(seq);
        state.ids.remove(id);
        Ok(state.documents.remove(&seq).unwrap_or(Value::Null))
    }

    // =========================================================================
    // OVERRIDES & SYNONYMS
    // =========================================================================

    /// Insert or replace an override by id.
    pub fn add_override(&self, ov: Override) -> Result<()> {
        ov.validate()?;
        let mut rules = self.rules.write();
        self.ensure_live()?;
        let raw = serde_json::to_string(&ov).map_err(|e| Error::Persistence(e.to_string()))?;
        self.store.put(&store::override_key(self.name(), &ov.id), &raw)?;
        rules.upsert_override(ov);
        Ok(())
    }

    pub fn remove_override(&self, id: &str) -> Result<()> {
        let mut rules = self.rules.write();
        self.ensure_live()?;
        if rules.get_override(id).is_none() {
            return Err(Error::NotFound(format!("Could not find an override with id: {}", id)));
        }
        self.store.delete(&store::override_key(self.name(), id))?;
        rules.remove_override(id);
        Ok(())
    }

    pub fn overrides(&self) -> Vec<Override> {
        self.rules.read().overrides().cloned().collect()
    }

    /// Insert or replace a synonym group by id.
    pub fn add_synonym(&self, synonym: Synonym) -> Result<()> {
        synonym.validate()?;
        let mut rules = self.rules.write();
        self.ensure_live()?;
        let raw = serde_json::to_string(&synonym).map_err(|e| Error::Persistence(e.to_string()))?;
        self.store.put(&store::synonym_key(self.name(), &synonym.id), &raw)?;
        rules.upsert_synonym(synonym);
        Ok(())
    }

    pub fn remove_synonym(&self, id: &str) -> Result<()> {
        let mut rules = self.rules.write();
        self.ensure_live()?;
        if rules.get_synonym(id).is_none() {
            return Err(Error::NotFound(format!("Could not find a synonym with id: {}", id)));
        }
        self.store.delete(&store::synonym_key(self.name(), id))?;
        rules.remove_synonym(id);
        Ok(())
    }

    pub fn synonyms(&self) -> Vec<Synonym> {
        self.rules.read().synonyms().cloned().collect()
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    pub fn search(&self, params: &SearchParams) -> Result<SearchResult> {
        let fields = self.query_fields(params)?;

        if params.page == 0 {
            return Err(Error::InvalidParameter(
                "Page must be an integer of value greater than 0.".into(),
            ));
        }
        if params.per_page > MAX_PER_PAGE {
            return Err(Error::InvalidParameter(format!(
                "Only upto {} hits can be fetched per page.",
                MAX_PER_PAGE
            )));
        }

        let filter = params
            .filter_by
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(|f| Filter::parse(f, &self.schema, &self.tokenizer))
            .transpose()?;

        let resolution = self
            .rules
            .read()
            .resolve(&params.q, &self.tokenizer, params.enable_overrides);

        let state = self.state.read();

        let hidden: HashSet<SeqId> = resolution
            .excluded
            .iter()
            .chain(&params.hidden_hits)
            .filter_map(|id| state.ids.get(id).copied())
            .collect();
        let pinned = pinned_positions(&state, params, &resolution, &hidden);
        let pinned_seqs: HashSet<SeqId> = pinned.iter().map(|(seq, _)| *seq).collect();

        let accept = |seq: SeqId| {
            !hidden.contains(&seq)
                && !pinned_seqs.contains(&seq)
                && filter.as_ref().map_or(true, |f| {
                    state.documents.get(&seq).is_some_and(|doc| f.matches(doc))
                })
        };

        let limit = params.max_candidates.unwrap_or(usize::MAX);
        let matches = if resolution.match_all {
            match_all(
                state
                    .documents
                    .keys()
                    .copied()
                    .filter(|&seq| accept(seq))
                    .take(limit),
            )
        } else {
            let search_fields: Vec<SearchField<'_>> = fields
                .iter()
                .filter_map(|f| {
                    state.index.field(f.schema_idx).map(|index| SearchField {
                        index,
                        num_typos: f.num_typos,
                        prefix: f.prefix,
                    })
                })
                .collect();
            let planner = Planner {
                drop_tokens_threshold: params.drop_tokens_threshold,
                typo_tokens_threshold: params.typo_tokens_threshold,
                max_typos: fields.iter().map(|f| f.num_typos).max().unwrap_or(0),
                max_candidates: limit,
            };
            planner.execute(&Matcher::new(&search_fields), &resolution.slots, accept)
        };

        let weights: Vec<u32> = fields.iter().map(|f| f.weight).collect();
        let mut scored: Vec<ScoredDocument> = matches
            .iter()
            .map(|(&seq, field_matches)| ScoredDocument {
                seq,
                text_match: text_match(field_matches, &weights, params.prioritize_exact_match),
                fields_matched: field_matches.len() as u32,
                tie_break: self.tie_break(state.documents.get(&seq)),
            })
            .collect();
        rank(&mut scored);

        let mut ordered: Vec<(SeqId, u64, u32)> = scored
            .iter()
            .map(|d| (d.seq, d.text_match, d.fields_matched))
            .collect();
        for (seq, position) in &pinned {
            let at = position.saturating_sub(1).min(ordered.len());
            ordered.insert(at, (*seq, 0, 0));
        }

        let found = ordered.len();
        let start = (params.page as usize - 1).saturating_mul(params.per_page);
        let page_hits: Vec<(SeqId, u64, u32)> = ordered
            .into_iter()
            .skip(start)
            .take(params.per_page)
            .collect();

        let highlighter = Highlighter::new(
            &self.tokenizer,
            &resolution.slots,
            HighlightOptions {
                start_tag: &params.highlight_start_tag,
                end_tag: &params.highlight_end_tag,
                snippet_threshold: params.snippet_threshold,
                affix: params.highlight_affix_num_tokens,
            },
        );

        let mut hits = Vec::with_capacity(page_hits.len());
        for (seq, score, fields_matched) in page_hits {
            let Some(document) = state.documents.get(&seq) else {
                continue;
            };
            let highlight_fields =
                self.highlight_fields(params, &fields, matches.get(&seq), resolution.slots.len());
            hits.push(Hit {
                document: project(document, params),
                highlights: highlighter.highlight(document, &highlight_fields),
                text_match: score,
                fields_matched,
            });
        }

        debug!(
            collection = %self.name(),
            q = %params.q,
            found,
            page = params.page,
            "search"
        );

        Ok(SearchResult {
            found,
            out_of: state.documents.len(),
            page: params.page,
            hits,
            matched_overrides: resolution.matched_overrides,
        })
    }

    /// Resolve `query_by` and its per-field vectors against the schema.
    fn query_fields(&self, params: &SearchParams) -> Result<Vec<QueryField>> {
        let names: Vec<&str> = if params.query_by.is_empty() {
            self.schema
                .fields
                .iter()
                .filter(|f| f.is_searchable())
                .map(|f| f.name.as_str())
                .collect()
        } else {
            params.query_by.iter().map(|s| s.trim()).collect()
        };

        if !params.query_by_weights.is_empty() && params.query_by_weights.len() != names.len() {
            return Err(Error::InvalidParameter(
                "Number of weights in `query_by_weights` does not match number of `query_by` fields."
                    .into(),
            ));
        }
        let num_typos = per_field(&params.num_typos, names.len(), "num_typos")?;
        let prefix = per_field(&params.prefix, names.len(), "prefix")?;
        if num_typos.iter().any(|&n| n > MAX_TYPOS) {
            return Err(Error::InvalidParameter(format!(
                "Value of `num_typos` must not be greater than {}.",
                MAX_TYPOS
            )));
        }

        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let Some(schema_idx) = self.schema.field_index(name) else {
                    return Err(Error::NotFound(format!(
                        "Could not find a field named `{}` in the schema.",
                        name
                    )));
                };
                if !self.schema.fields[schema_idx].is_searchable() {
                    return Err(Error::InvalidParameter(format!(
                        "Field `{}` should be an indexed string or string array field.",
                        name
                    )));
                }
                Ok(QueryField {
                    schema_idx,
                    name: (*name).to_string(),
                    num_typos: num_typos[i],
                    prefix: prefix[i],
                    weight: params
                        .query_by_weights
                        .get(i)
                        .copied()
                        .unwrap_or_else(|| default_weight(i)),
                })
            })
            .collect()
    }

    /// Which fields of a hit to highlight, and with which token rules.
    ///
    /// Token rules follow the round the hit was found in: its typo level caps
    /// the budget and only that round's last slot may prefix-match. Hits with
    /// no match record (pins) use the field's own rules over the full query.
    fn highlight_fields<'a>(
        &self,
        params: &'a SearchParams,
        fields: &'a [QueryField],
        matched: Option<&Vec<FieldMatch>>,
        query_slots: usize,
    ) -> Vec<HighlightField<'a>> {
        let full = |name: &str| params.highlight_full_fields.iter().any(|f| f == name);
        let matched: &[FieldMatch] = matched.map(Vec::as_slice).unwrap_or_default();
        let typo_level = matched.first().map(|m| m.typo_level);
        let last_slot = matched
            .iter()
            .flat_map(|m| m.slots.iter().map(|s| s.slot))
            .max()
            .or_else(|| query_slots.checked_sub(1));

        let rules = |field_pos: Option<usize>, num_typos: u32, prefix: bool| {
            match field_pos.and_then(|i| matched.iter().find(|m| m.field == i)) {
                Some(m) => (num_typos.min(m.typo_level), m.prefix_slot),
                None => (
                    typo_level.map_or(num_typos, |level| num_typos.min(level)),
                    last_slot.filter(|_| prefix),
                ),
            }
        };

        if !params.highlight_fields.is_empty() {
            let default_typos = params.num_typos.first().copied().unwrap_or(0);
            let default_prefix = params.prefix.first().copied().unwrap_or(false);
            return params
                .highlight_fields
                .iter()
                .map(|name| name.trim())
                .filter(|name| self.schema.field(name).is_some_and(|f| f.field_type.is_text()))
                .map(|name| {
                    let searched = fields.iter().position(|f| f.name == name);
                    let (num_typos, prefix) = searched.map_or((default_typos, default_prefix), |i| {
                        (fields[i].num_typos, fields[i].prefix)
                    });
                    let (num_typos, prefix_slot) = rules(searched, num_typos, prefix);
                    HighlightField {
                        name,
                        num_typos,
                        prefix_slot,
                        full: full(name),
                    }
                })
                .collect();
        }

        fields
            .iter()
            .enumerate()
            .filter(|(i, _)| matched.iter().any(|m| m.field == *i))
            .filter(|(_, f)| !params.exclude_fields.iter().any(|e| *e == f.name))
            .map(|(i, f)| {
                let (num_typos, prefix_slot) = rules(Some(i), f.num_typos, f.prefix);
                HighlightField {
                    name: &f.name,
                    num_typos,
                    prefix_slot,
                    full: full(&f.name),
                }
            })
            .collect()
    }

    fn tie_break(&self, document: Option<&Value>) -> Option<f64> {
        let field = self.schema.default_sorting_field.as_deref()?;
        document?.get(field)?.as_f64()
    }
}

/// Per-query pins first, then override pins. Unknown and hidden ids are
/// ignored; the first pin of a document wins. Sorted by position.
fn pinned_positions(
    state: &State,
    params: &SearchParams,
    resolution: &Resolution,
    hidden: &HashSet<SeqId>,
) -> Vec<(SeqId, usize)> {
    let mut seen = HashSet::new();
    let mut pinned: Vec<(SeqId, usize)> = params
        .pinned_hits
        .iter()
        .map(|p| (p.id.as_str(), p.position))
        .chain(resolution.pinned.iter().map(|(id, pos)| (id.as_str(), *pos)))
        .filter_map(|(id, pos)| state.ids.get(id).map(|&seq| (seq, pos)))
        .filter(|(seq, _)| !hidden.contains(seq) && seen.insert(*seq))
        .collect();
    pinned.sort_by_key(|&(seq, pos)| (pos, seq));
    pinned
}


/// Apply `include_fields` / `exclude_fields` to a stored document.
fn project(document: &Value, params: &SearchParams) -> Value {
    let Value::Object(map) = document else {
        return document.clone();
    };
    let projected: Map<String, Value> = map
        .iter()
        .filter(|(k, _)| params.include_fields.is_empty() || params.include_fields.contains(*k))
        .filter(|(k, _)| !params.exclude_fields.contains(*k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(projected)
}

/// Broadcast a single value, or take one per field.
fn per_field<T: Copy>(values: &[T], fields: usize, name: &str) -> Result<Vec<T>> {
    match values {
        [] => Err(Error::InvalidParameter(format!("`{}` must not be empty.", name))),
        [one] => Ok(vec![*one; fields]),
        many if many.len() == fields => Ok(many.to_vec()),
        _ => Err(Error::InvalidParameter(format!(
            "Number of values in `{}` does not match number of `query_by` fields.",
            name
        ))),
    }
}

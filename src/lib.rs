// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typo-tolerant, multi-field full-text search over JSON documents.
//!
//! A collection has a schema of typed fields. Documents go in as JSON, get
//! tokenized per field into an inverted index, and come back out of
//! [`Collection::search`] ranked and highlighted.
//!
//! # Architecture
//!
//! ```text
//!                ┌──────────────────────┐
//!                │  CollectionManager   │  name → Arc<Collection>, ids, load/drop
//!                └──────────┬───────────┘
//!                           ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │ Collection::search                                             │
//! │                                                                │
//! │  rules ──► tokenizer ──► planner ─┬─► matcher ──► index        │
//! │ (overrides,              (drop,   │   (typos,     (per field)  │
//! │  synonyms)               typos)   │    prefix)                 │
//! │                                   └─► filter                   │
//! │                                                                │
//! │  scoring ──► pin/hide ──► paginate ──► highlight ──► project   │
//! └────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!                ┌──────────────────────┐
//!                │     dyn Store        │  $CN  $CM_  $DC_  $CO_  $CY_
//!                └──────────────────────┘
//! ```
//!
//! # Matching in one paragraph
//!
//! The query becomes *slots*, one per token (or synonym phrase). Every slot
//! must match somewhere in a document (AND); a slot may match in any searched
//! field (OR). Inside a field, a slot matches a token exactly, within a typo
//! budget that grows with token length, or (last slot only) as a literal
//! prefix. When the full query finds too little, the planner drops slots from
//! the right, then from the left, and widens the typo budget one level at a
//! time.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use ferret::{CollectionManager, CollectionSchema, Field, FieldType, MemoryStore, SearchParams};
//!
//! let manager = CollectionManager::new(Arc::new(MemoryStore::new()));
//! let schema = CollectionSchema::new(
//!     "books",
//!     vec![
//!         Field::new("title", FieldType::String),
//!         Field::new("points", FieldType::Int32),
//!     ],
//! )
//! .with_sorting_field("points");
//! let books = manager.create_collection(schema).unwrap();
//!
//! books.add(r#"{"id": "1", "title": "The Quick Brown Fox", "points": 10}"#).unwrap();
//!
//! let result = books.search(&SearchParams::new("quck", &["title"])).unwrap();
//! assert_eq!(result.found, 1);
//! ```

pub mod collection;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod highlight;
pub mod index;
pub mod manager;
pub mod rules;
pub mod scoring;
pub mod search;
pub mod store;
pub mod testing;
pub mod tokenizer;
pub mod types;

pub use collection::{Collection, FieldStats, StoredDocument};
pub use error::{Error, Result};
pub use filter::Filter;
pub use fuzzy::{levenshtein_bounded, levenshtein_within, typo_allowance};
pub use highlight::{HighlightField, HighlightOptions, Highlighter};
pub use manager::CollectionManager;
pub use rules::{MatchType, Override, OverrideExclude, OverrideInclude, OverrideRule, RuleSet, Synonym};
pub use search::{PinnedHit, SearchParams, Slot, WILDCARD_QUERY};
pub use store::{MemoryStore, Store};
pub use tokenizer::{Token, Tokenizer, TokenizerConfig};
pub use types::{CollectionSchema, Field, FieldType, Highlight, Hit, SearchResult, SeqId};

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the ferret command-line interface.
//!
//! Two subcommands, both working on a schema JSON file plus a JSONL file of
//! documents loaded into an in-memory collection: `search` runs one query and
//! prints ranked, highlighted hits, `inspect` prints what the index holds.

pub mod display;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ferret",
    about = "Typo-tolerant multi-field search over JSON documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the collection comes from.
#[derive(Args, Debug, Clone)]
pub struct CollectionInput {
    /// Collection schema (JSON: name, fields, default_sorting_field)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Documents, one JSON object per line
    #[arg(short, long)]
    pub docs: PathBuf,

    /// Overrides (JSON array)
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// Synonyms (JSON array)
    #[arg(long)]
    pub synonyms: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load documents and run a search
    Search {
        #[command(flatten)]
        input: CollectionInput,

        /// Search query, `*` for all documents
        query: String,

        /// Comma-separated fields to search (default: every searchable field)
        #[arg(short = 'b', long, value_delimiter = ',')]
        query_by: Vec<String>,

        /// Comma-separated field weights, one per `--query-by` field
        #[arg(long, value_delimiter = ',')]
        weights: Vec<u32>,

        /// Filter, e.g. `points:>10 && in_stock:true`
        #[arg(short, long)]
        filter: Option<String>,

        /// Typo budget (0-2)
        #[arg(short, long, default_value = "2")]
        typos: u32,

        /// Match the last token only as a whole word
        #[arg(long)]
        no_prefix: bool,

        /// 1-based page
        #[arg(long, default_value = "1")]
        page: u32,

        /// Hits per page
        #[arg(short = 'n', long, default_value = "10")]
        per_page: usize,

        /// Drop query tokens while fewer results than this were found
        #[arg(long, default_value = "10")]
        drop_tokens_threshold: usize,

        /// Print the raw result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Load documents and print per-field index statistics
    Inspect {
        #[command(flatten)]
        input: CollectionInput,
    },
}

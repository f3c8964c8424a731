// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ferret::{
    Collection, CollectionManager, CollectionSchema, MemoryStore, Override, SearchParams,
    SearchResult, Synonym,
};

mod cli;
use cli::display::{self, BOLD, CYAN, GRAY, MAGENTA};
use cli::{Cli, CollectionInput, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FERRET_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Search {
            input,
            query,
            query_by,
            weights,
            filter,
            typos,
            no_prefix,
            page,
            per_page,
            drop_tokens_threshold,
            json,
        } => {
            let by: Vec<&str> = query_by.iter().map(String::as_str).collect();
            let mut params = SearchParams::new(query, &by)
                .weights(&weights)
                .typos(typos)
                .prefix(!no_prefix)
                .page(page, per_page)
                .drop_tokens_threshold(drop_tokens_threshold);
            if let Some(filter) = filter {
                params = params.filter(filter);
            }
            run_search(&input, &params, json)
        }
        Commands::Inspect { input } => run_inspect(&input),
    };

    if let Err(e) = outcome {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

/// Build an in-memory collection from the input files.
fn load_collection(input: &CollectionInput) -> Result<Arc<Collection>> {
    let schema: CollectionSchema = read_json(&input.schema)?;
    let manager = CollectionManager::new(Arc::new(MemoryStore::new()));
    let collection = manager.create_collection(schema)?;

    let docs = fs::read_to_string(&input.docs)
        .with_context(|| format!("reading {}", input.docs.display()))?;
    let mut rejected = 0usize;
    for (line_no, line) in docs.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = collection.add(line) {
            warn!(line = line_no + 1, %err, "document rejected");
            rejected += 1;
        }
    }
    if collection.num_documents() == 0 && rejected > 0 {
        bail!("all {} documents in {} were rejected", rejected, input.docs.display());
    }

    if let Some(path) = &input.overrides {
        let overrides: Vec<Override> = read_json(path)?;
        for ov in overrides {
            collection.add_override(ov)?;
        }
    }
    if let Some(path) = &input.synonyms {
        let synonyms: Vec<Synonym> = read_json(path)?;
        for synonym in synonyms {
            collection.add_synonym(synonym)?;
        }
    }

    Ok(collection)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn run_search(input: &CollectionInput, params: &SearchParams, json: bool) -> Result<()> {
    let collection = load_collection(input)?;
    let result = collection.search(params)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    print_result(&collection, params, &result);
    Ok(())
}

fn print_result(collection: &Collection, params: &SearchParams, result: &SearchResult) {
    display::section_top(&format!("{} · \"{}\"", collection.name(), params.q));
    display::row(&format!(
        " found {} of {} · page {}",
        display::themed(CYAN, &[BOLD], &result.found.to_string()),
        result.out_of,
        result.page
    ));
    if !result.matched_overrides.is_empty() {
        display::row(&format!(
            " overrides: {}",
            display::themed(MAGENTA, &[], &result.matched_overrides.join(", "))
        ));
    }

    for (rank, hit) in result.hits.iter().enumerate() {
        display::section_mid(&format!("#{} {}", rank + 1, hit.id()));
        display::row(&format!(
            " score {} · fields {}",
            display::score_value(hit.text_match),
            hit.fields_matched
        ));
        for highlight in &hit.highlights {
            let snippet = display::render_snippet(
                &display::truncate(&highlight.snippet, 200),
                &params.highlight_start_tag,
                &params.highlight_end_tag,
            );
            display::row(&format!(
                " {} {}",
                display::pad_right(&display::themed(GRAY, &[], &highlight.field), 14),
                snippet
            ));
        }
    }
    display::section_bot();
}

fn run_inspect(input: &CollectionInput) -> Result<()> {
    let collection = load_collection(input)?;
    let schema = collection.schema();

    display::section_top(&format!("collection {}", collection.name()));
    display::row(&format!(" documents   {}", collection.num_documents()));
    if let Some(sorting) = &schema.default_sorting_field {
        display::row(&format!(" sorting     {}", sorting));
    }
    display::row(&format!(" overrides   {}", collection.overrides().len()));
    display::row(&format!(" synonyms    {}", collection.synonyms().len()));

    display::section_mid("fields");
    for field in &schema.fields {
        let mut flags = Vec::new();
        if field.facet {
            flags.push("facet");
        }
        if field.optional {
            flags.push("optional");
        }
        if !field.index {
            flags.push("unindexed");
        }
        display::row(&format!(
            " {} {} {}",
            display::pad_right(&field.name, 20),
            display::pad_right(field.field_type.as_str(), 10),
            display::themed(GRAY, &[], &flags.join(" "))
        ));
    }

    display::section_mid("index");
    for stats in collection.field_stats() {
        display::row(&format!(
            " {} {} terms · {} documents",
            display::pad_right(&stats.name, 20),
            display::themed(CYAN, &[], &stats.vocabulary.to_string()),
            stats.documents
        ));
    }
    display::section_bot();
    Ok(())
}

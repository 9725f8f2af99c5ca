// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! `scholar-search` CLI entry point.
//!
//! The library crate returns [`scholar_search::EngineError`] everywhere;
//! this binary wraps every call in `anyhow::Result` instead so each
//! subcommand handler can attach the file or index path that was in play
//! when something failed, which is what actually helps at a terminal.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use scholar_search::engine::Engine;

mod cli;
use cli::display::{print_hits, print_suggestions};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { corpus, output } => run_build(&corpus, &output),
        Commands::Serve { index, addr } => run_serve(&index, addr).await,
        Commands::AddDoc { index, file } => run_add_doc(&index, &file),
        Commands::Suggest { index, prefix } => run_suggest(&index, &prefix),
        Commands::Search { index, query } => run_search(&index, &query),
        Commands::Inspect { index } => run_inspect(&index),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run_build(corpus: &std::path::Path, output: &std::path::Path) -> Result<()> {
    Engine::build(output, corpus)
        .with_context(|| format!("building index at {} from {}", output.display(), corpus.display()))?;
    println!("built index at {}", output.display());
    Ok(())
}

async fn run_serve(index: &std::path::Path, addr: std::net::SocketAddr) -> Result<()> {
    let engine = open_engine(index)?;
    scholar_search::server::serve(engine, addr).await;
    Ok(())
}

fn run_add_doc(index: &std::path::Path, file: &std::path::Path) -> Result<()> {
    let engine = open_engine(index)?;
    let raw = read_input(file).with_context(|| format!("reading document from {}", file.display()))?;
    let doc: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing document from {} as json", file.display()))?;
    let edid = engine.add_document(doc).context("ingesting document")?;
    println!("ingested document {edid}");
    Ok(())
}

fn run_suggest(index: &std::path::Path, prefix: &str) -> Result<()> {
    let engine = open_engine(index)?;
    print_suggestions(&engine.suggest(prefix));
    Ok(())
}

fn run_search(index: &std::path::Path, query: &str) -> Result<()> {
    let engine = open_engine(index)?;
    let hits = engine.search(query).with_context(|| format!("searching for {query:?}"))?;
    print_hits(&hits);
    Ok(())
}

fn run_inspect(index: &std::path::Path) -> Result<()> {
    let config = scholar_search::config::EngineConfig::new(index);
    let lexicon = scholar_search::lexicon::Lexicon::load(&config.lexicon_path())
        .with_context(|| format!("loading lexicon from {}", index.display()))?;
    let docmap = scholar_search::docmap::DocMap::load(&config.docmap_path())
        .with_context(|| format!("loading docmap from {}", index.display()))?;
    println!("index:    {}", index.display());
    println!("words:    {}", lexicon.len());
    println!("docs:     {}", docmap.len());
    println!("barrels:  {}", config.n_barrels);

    let mut corrupt = Vec::new();
    for b in 0..config.n_barrels {
        if !scholar_search::barrel::verify_barrel_checksum(&config, b)
            .with_context(|| format!("verifying checksum for barrel {b}"))?
        {
            corrupt.push(b);
        }
    }
    if corrupt.is_empty() {
        println!("checksums: ok");
    } else {
        println!("checksums: {} barrel(s) failed: {:?}", corrupt.len(), corrupt);
    }
    Ok(())
}

fn open_engine(index: &std::path::Path) -> Result<Engine> {
    Engine::open(index).with_context(|| format!("opening index at {}", index.display()))
}

fn read_input(path: &std::path::Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

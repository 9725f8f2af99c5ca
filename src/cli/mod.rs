// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions (§4.12): `build`, `serve`, `add-doc`, `suggest`,
//! `search`, and `inspect` subcommands over a scholar-search index
//! directory.

pub mod display;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scholar-search", about = "Full-text search over scholarly JSON records", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an index from a JSONL corpus of scholarly records.
    Build {
        /// Path to the raw JSONL corpus, one document per line.
        #[arg(short, long)]
        corpus: PathBuf,

        /// Directory to write the lexicon, docmap, and barrels into.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Serve `GET /search`, `GET /autocomplete`, and `POST /adddoc` over HTTP.
    Serve {
        /// Index directory produced by `build`.
        #[arg(short, long)]
        index: PathBuf,

        /// Address to bind the HTTP server to.
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },

    /// Ingest a single JSON document into an already-built index.
    AddDoc {
        /// Index directory produced by `build`.
        #[arg(short, long)]
        index: PathBuf,

        /// Path to a JSON file containing one document, or `-` for stdin.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Autocomplete a query prefix against the index's vocabulary.
    Suggest {
        /// Index directory produced by `build`.
        #[arg(short, long)]
        index: PathBuf,

        /// The prefix to complete.
        prefix: String,
    },

    /// Run a query and print ranked results.
    Search {
        /// Index directory produced by `build`.
        #[arg(short, long)]
        index: PathBuf,

        /// The query string.
        query: String,
    },

    /// Print a summary of an index directory's on-disk structures.
    Inspect {
        /// Index directory produced by `build`.
        #[arg(short, long)]
        index: PathBuf,
    },
}

// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! The error taxonomy from §7: most conditions here are *recovered locally*
//! by the caller (skip the offending unit, log, continue). `EngineError`
//! exists so that decision is explicit at each call site rather than an
//! `unwrap()` away from a panic.

use thiserror::Error;

/// Errors surfaced by the core engine.
///
/// Only [`EngineError::Io`] on the lexicon file at startup and
/// [`EngineError::IngestFailed`] are meant to propagate all the way to a
/// caller; the rest are typically caught, logged at `warn!`/`debug!`, and
/// the offending unit is skipped (§7).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json at line {line}: {source}")]
    MalformedJson {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed posting token: {0}")]
    MalformedToken(String),

    #[error("short read hydrating document {edid}: wanted {wanted} bytes, corpus had {available}")]
    CorpusShortRead {
        edid: String,
        wanted: u64,
        available: u64,
    },

    #[error("query term not indexed: {0}")]
    TermNotIndexed(String),

    #[error("ingest failed: {reason}")]
    IngestFailed { reason: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;

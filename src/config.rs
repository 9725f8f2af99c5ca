// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Engine tunables, named the way `scoring/core.rs` names its constants in
//! the upstream project this crate's structure is patterned on: named
//! constants with a one-line rationale, not magic numbers scattered through
//! the pipeline.

use std::path::{Path, PathBuf};

/// Number of barrels the inverted index is partitioned into (§4.6).
/// Fixed by design, not configurable: the barrel-selection formula
/// `wid % N_BARRELS` is baked into every on-disk offset index.
pub const N_BARRELS: u32 = 100;

/// Ceiling on how many doc-ids are pulled from the rarest term's posting
/// list before intersection begins (§4.7). Bounds worst-case query latency
/// on pathologically common terms without affecting correctness for the
/// overwhelming majority of queries, whose rarest term has far fewer hits.
pub const MAX_DOCS_PER_TERM: usize = 200_000;

/// Number of ranked results returned by a single query (§4.7).
pub const TOP_K: usize = 10;

/// Minimum prefix length accepted by autocomplete (§4.9).
pub const MIN_AUTOCOMPLETE_PREFIX: usize = 3;

/// Maximum prefix length indexed per word (§4.9): words longer than this
/// still generate prefixes, but only up to this many characters.
pub const MAX_AUTOCOMPLETE_PREFIX: usize = 8;

/// Maximum number of suggestions returned per prefix lookup (§4.9).
pub const MAX_AUTOCOMPLETE_RESULTS: usize = 18;

/// Maximum number of suggestions retained per prefix in the index (§4.9).
pub const MAX_SUGGESTIONS_PER_PREFIX: usize = 100;

/// Minimum word length indexed for autocomplete (§4.9).
pub const MIN_INDEXED_WORD_LEN: usize = 3;

/// Where the persistent index structures live on disk, and what to call
/// them. Mirrors the file names fixed by §6 (`AUC.csv` in particular is an
/// intentional on-disk quirk, not a typo).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub index_dir: PathBuf,
    pub n_barrels: u32,
    pub max_docs_per_term: usize,
    pub top_k: usize,
}

impl EngineConfig {
    pub fn new(index_dir: impl Into<PathBuf>) -> Self {
        EngineConfig {
            index_dir: index_dir.into(),
            n_barrels: N_BARRELS,
            max_docs_per_term: MAX_DOCS_PER_TERM,
            top_k: TOP_K,
        }
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.index_dir.join("corpus.jsonl")
    }

    pub fn lexicon_path(&self) -> PathBuf {
        self.index_dir.join("lexicon.txt")
    }

    pub fn docmap_path(&self) -> PathBuf {
        self.index_dir.join("AUC.csv")
    }

    pub fn forward_index_path(&self) -> PathBuf {
        self.index_dir.join("forward_index.txt")
    }

    pub fn inverted_index_path(&self) -> PathBuf {
        self.index_dir.join("inverted_index.txt")
    }

    pub fn barrel_dir(&self) -> PathBuf {
        self.index_dir.join("barrels")
    }

    pub fn barrel_text_path(&self, barrel: u32) -> PathBuf {
        self.barrel_dir().join(format!("barrel_{barrel}.txt"))
    }

    pub fn barrel_idx_path(&self, barrel: u32) -> PathBuf {
        self.barrel_dir().join(format!("barrel_{barrel}.idx"))
    }

    pub fn barrel_crc_path(&self, barrel: u32) -> PathBuf {
        self.barrel_dir().join(format!("barrel_{barrel}.crc32"))
    }

    #[inline]
    pub fn barrel_of(&self, wid: u32) -> u32 {
        wid % self.n_barrels
    }
}

/// Ensure the index directory and its `barrels/` subdirectory exist.
pub fn ensure_layout(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::create_dir_all(dir.join("barrels"))?;
    Ok(())
}

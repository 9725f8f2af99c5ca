// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! The `Engine`: one shared facade wiring the lexicon, docmap, barrels,
//! query executor, dynamic indexer, and autocomplete index behind a single
//! `Arc`-friendly type (§4.10).
//!
//! All mutable state lives behind one `parking_lot::RwLock` (§4.15): a
//! query takes a read guard, so any number of concurrent searches and
//! autocompletes proceed together, while `add_document` takes a write
//! guard and serializes against both other ingests and any in-flight
//! query. This is stricter than §5's minimum requirement (readers that
//! reopen files would eventually observe an ingest's writes on their own),
//! but it is what guarantees a document is searchable by the *in-memory*
//! lexicon and docmap immediately after `add_document` returns, not just
//! eventually-from-disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::docmap::DocMap;
use crate::error::Result;
use crate::ingest::IngestState;
use crate::lexicon::Lexicon;
use crate::types::{Edid, SearchHit};

/// The full search engine: one instance per open index directory.
///
/// Cheap to clone (it's just an `Arc` underneath), so a server handler can
/// hold its own `Engine` without sharing a borrow across requests.
#[derive(Clone)]
pub struct Engine {
    config: Arc<EngineConfig>,
    state: Arc<RwLock<IngestState>>,
}

impl Engine {
    /// Open an engine over an already-built (or empty) index directory.
    pub fn open(index_dir: impl Into<PathBuf>) -> Result<Self> {
        let config = EngineConfig::new(index_dir);
        crate::config::ensure_layout(&config.barrel_dir())?;
        let state = IngestState::load(&config)?;

        Ok(Engine {
            config: Arc::new(config),
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Reload all in-memory state from disk, e.g. after an offline rebuild
    /// replaced the lexicon, barrels, or docmap out from under this engine.
    pub fn reload(&self) -> Result<()> {
        let fresh = IngestState::load(&self.config)?;
        *self.state.write() = fresh;
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a query against the current in-memory lexicon, docmap, and
    /// barrel offsets (§4.7).
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let state = self.state.read();
        crate::search::search(&self.config, &state.lexicon, &state.offsets, &state.docmap, query)
    }

    /// Autocomplete a prefix (§4.9).
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.state.read().autocomplete.suggest(prefix)
    }

    /// Ingest one document (§4.8).
    pub fn add_document(&self, doc: Value) -> Result<Edid> {
        let mut state = self.state.write();
        state.add_document(&self.config, doc)
    }

    /// Build (or rebuild) an index from scratch at `index_dir` from a raw
    /// JSONL corpus (§4.2-§4.6). This is the offline batch path; an `Engine`
    /// opened afterward (or reloaded) will see the result.
    pub fn build(index_dir: impl Into<PathBuf>, corpus_path: &Path) -> Result<()> {
        let config = EngineConfig::new(index_dir);
        crate::config::ensure_layout(&config.barrel_dir())?;

        std::fs::copy(corpus_path, config.corpus_path())?;
        let docmap = DocMap::build(&config.corpus_path(), &config.docmap_path())?;

        let mut lexicon = Lexicon::load(&config.lexicon_path())?;
        crate::forward::build_forward_index(
            &config.corpus_path(),
            &mut lexicon,
            &config.lexicon_path(),
            &config.forward_index_path(),
        )?;

        crate::inverted::build_inverted_index(
            &config.forward_index_path(),
            &config.inverted_index_path(),
            docmap.len() as u64,
        )?;

        crate::barrel::build_barrels(&config, &config.inverted_index_path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn build_then_open_then_search_round_trips() {
        let dir = tempdir().unwrap();
        let corpus = dir.path().join("input.jsonl");
        std::fs::write(
            &corpus,
            r#"{"id":"p1","title":"quantum entanglement","abstract":"study"}"#.to_string() + "\n",
        )
        .unwrap();

        let index_dir = dir.path().join("index");
        Engine::build(&index_dir, &corpus).unwrap();

        let engine = Engine::open(&index_dir).unwrap();
        let hits = engine.search("quantum").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document["id"], "p1");
    }

    #[test]
    fn add_document_is_immediately_searchable_and_suggestible() {
        let dir = tempdir().unwrap();
        let index_dir = dir.path().join("index");
        let engine = Engine::open(&index_dir).unwrap();

        engine
            .add_document(serde_json::json!({"id": "new-doc", "title": "graph neural networks"}))
            .unwrap();

        let hits = engine.search("graph").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document["id"], "new-doc");
        assert!(engine.suggest("gra").contains(&"graph".to_string()));
    }
}

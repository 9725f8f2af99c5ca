// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dynamic indexing: incremental ingestion of a single document into an
//! already-built index (§4.8).
//!
//! Durability order matters and is fixed by the spec: raw corpus first,
//! then the docmap, then lexicon additions, then the forward index, then
//! the barrels. A crash partway through this sequence leaves a document
//! that is findable by fewer routes than it should be (e.g. present in the
//! corpus but not yet searchable) rather than a dangling reference into a
//! document that was never durably written — the safer failure direction
//! per §4.8 and §9.
//!
//! Callers are expected to serialize calls to [`IngestState::add_document`]
//! behind one lock (§4.15): nothing here is safe to run concurrently with
//! itself, since barrel appends and offset-index updates are not atomic
//! across more than one writer.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};

use serde_json::Value;

use crate::autocomplete::Autocomplete;
use crate::barrel::{append_ingested_posting, BarrelOffsets};
use crate::config::EngineConfig;
use crate::docmap::DocMap;
use crate::error::{EngineError, Result};
use crate::forward::{accumulate_occurrences, field_texts};
use crate::lexicon::Lexicon;
use crate::types::Edid;

/// The mutable state a dynamic-indexing call needs exclusive access to.
/// Bundled together so `Engine` can guard all of it with a single mutex
/// rather than four separate ones (§4.15): an ingest touches every one of
/// these structures in the same call, so separate locks would buy nothing
/// and risk inconsistent interleavings.
#[derive(Debug, Default)]
pub struct IngestState {
    pub lexicon: Lexicon,
    pub docmap: DocMap,
    pub offsets: BarrelOffsets,
    pub autocomplete: Autocomplete,
}

impl IngestState {
    pub fn load(config: &EngineConfig) -> Result<Self> {
        let lexicon = Lexicon::load(&config.lexicon_path())?;
        let docmap = DocMap::load(&config.docmap_path())?;
        let offsets = BarrelOffsets::load(config)?;
        let autocomplete = Autocomplete::build(&lexicon);
        Ok(IngestState {
            lexicon,
            docmap,
            offsets,
            autocomplete,
        })
    }

    /// Ingest one document, appending it to every persistent structure in
    /// the durable order described above (§4.8).
    ///
    /// Returns the document's external id: either the `id` field of `doc`,
    /// or a freshly synthesized `"new<k>"` id if `doc` has none.
    pub fn add_document(&mut self, config: &EngineConfig, mut doc: Value) -> Result<Edid> {
        let edid = match doc.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => self.docmap.next_synthetic_edid(),
        };
        // The stored document's `id` must equal its DocMap entry's edid
        // (§3, §8), so a synthesized id has to be written back in before
        // the line is persisted.
        if let Some(obj) = doc.as_object_mut() {
            obj.entry("id").or_insert_with(|| Value::String(edid.clone()));
        }

        let raw_line = serde_json::to_string(&doc).map_err(|source| EngineError::MalformedJson {
            line: 0,
            source,
        })?;

        let (offset, length) = append_corpus_line(&config.corpus_path(), &raw_line)?;
        self.docmap.append(&config.docmap_path(), &edid, offset, length)?;

        let fields = field_texts(&doc);
        let entries = accumulate_occurrences(&mut self.lexicon, &fields);
        self.lexicon.flush_appends(&config.lexicon_path())?;

        for (wid, _occ) in &entries {
            if let Some(word) = self.lexicon.word_for(*wid) {
                self.autocomplete.insert_word(word);
            }
        }

        for (wid, occ) in entries {
            append_ingested_posting(config, &mut self.offsets, wid, &edid, occ)?;
        }

        Ok(edid)
    }
}

/// Append one line to the raw corpus file and report the byte offset and
/// length (not counting the trailing newline) at which it landed, mirroring
/// the offset accounting `DocMap::build` performs for the initial bulk
/// build (§4.3, §4.8).
fn append_corpus_line(path: &std::path::Path, line: &str) -> Result<(u64, u64)> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let offset = file.seek(SeekFrom::End(0))?;
    writeln!(file, "{line}")?;
    file.flush()?;
    Ok((offset, line.len() as u64))
}

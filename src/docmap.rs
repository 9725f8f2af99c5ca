// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! External-id ↔ (internal-id, byte-offset, byte-length) map into the raw
//! corpus (§4.3).
//!
//! The on-disk format is `AUC.csv`, an intentional on-disk quirk: its first
//! line is a comma-delimited header that readers must skip and otherwise
//! ignore, while every data line after it is pipe-delimited. This is not a
//! bug to be "fixed" — §6 requires it verbatim for compatibility with the
//! rest of the toolchain this system is deployed alongside.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::warn;
use serde_json::Value;

use crate::error::Result;
use crate::types::{DocMapEntry, Edid, Idid};

pub const HEADER_LINE: &str = "internal_doc_id,original_doc_id,start_offset,length";

#[derive(Debug, Default)]
pub struct DocMap {
    entries: HashMap<Edid, DocMapEntry>,
    next_idid: u32,
    next_new_suffix: u32,
}

impl DocMap {
    /// Parse a `AUC.csv`-formatted file, skipping the header line.
    /// A missing file yields an empty map (§7).
    pub fn load(path: &Path) -> Result<Self> {
        let mut map = DocMap::default();
        let file = match std::fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(map),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file).lines();
        reader.next(); // header: format is commas, data is pipes — ignore contents
        for line in reader {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() != 4 {
                warn!("docmap: skipping malformed line: {line}");
                continue;
            }
            let (Ok(idid), edid, Ok(offset), Ok(length)) = (
                parts[0].parse::<u32>(),
                parts[1].to_string(),
                parts[2].parse::<u64>(),
                parts[3].parse::<u64>(),
            ) else {
                warn!("docmap: skipping malformed line: {line}");
                continue;
            };
            map.next_idid = map.next_idid.max(idid);
            if let Some(rest) = edid.strip_prefix("new") {
                if let Ok(n) = rest.parse::<u32>() {
                    map.next_new_suffix = map.next_new_suffix.max(n);
                }
            }
            map.entries.insert(
                edid,
                DocMapEntry {
                    idid: Idid(idid),
                    offset,
                    length,
                },
            );
        }
        Ok(map)
    }

    pub fn get(&self, edid: &str) -> Option<DocMapEntry> {
        self.entries.get(edid).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_internal_doc_id(&mut self) -> Idid {
        self.next_idid += 1;
        Idid(self.next_idid)
    }

    /// Synthesize the next `"new<k>"` external id for a document that
    /// arrives via the dynamic indexer without its own id (§3, §4.8).
    pub fn next_synthetic_edid(&mut self) -> Edid {
        self.next_new_suffix += 1;
        format!("new{}", self.next_new_suffix)
    }

    /// Append one row, durably, and record it in memory. Writes the header
    /// first if `path` doesn't exist yet (§4.3).
    pub fn append(&mut self, path: &Path, edid: &Edid, offset: u64, length: u64) -> Result<()> {
        let idid = self.next_internal_doc_id();
        let needs_header = !path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if needs_header {
            writeln!(file, "{HEADER_LINE}")?;
        }
        writeln!(file, "{idid}|{edid}|{offset}|{length}")?;
        file.flush()?;
        self.entries.insert(
            edid.clone(),
            DocMapEntry {
                idid,
                offset,
                length,
            },
        );
        Ok(())
    }

    /// Perform the single linear scan of the corpus that builds a fresh
    /// docmap from scratch (§4.3): record each line's byte offset and
    /// length (not counting the trailing newline) and pull `id` out of the
    /// parsed JSON.
    pub fn build(corpus_path: &Path, out_path: &Path) -> Result<DocMap> {
        let mut map = DocMap::default();
        let corpus = std::fs::read(corpus_path)?;
        let mut out = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(out_path)?;
        writeln!(out, "{HEADER_LINE}")?;

        let mut offset: u64 = 0;
        let mut unassigned = 0u32;
        for raw_line in corpus.split(|&b| b == b'\n') {
            if raw_line.is_empty() {
                offset += 1; // account for the newline we split on
                continue;
            }
            let length = raw_line.len() as u64;
            let line_str = String::from_utf8_lossy(raw_line);
            match serde_json::from_str::<Value>(&line_str) {
                Ok(value) => {
                    let edid = value
                        .get("id")
                        .and_then(Value::as_str)
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| {
                            unassigned += 1;
                            format!("Unassigned{unassigned}")
                        });
                    let idid = map.next_internal_doc_id();
                    writeln!(out, "{idid}|{edid}|{offset}|{length}")?;
                    map.entries.insert(edid, DocMapEntry { idid, offset, length });
                }
                Err(_) => {
                    warn!("docmap: skipping unparsable line at offset {offset}");
                }
            }
            offset += length + 1;
        }
        out.flush()?;
        Ok(map)
    }
}

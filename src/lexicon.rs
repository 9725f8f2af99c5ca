// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bidirectional word ↔ word-id mapping (§4.2).
//!
//! Persisted as whitespace-separated `word WID\n` lines. IDs are assigned
//! monotonically starting at 1 and are never reused or gapped, so a word's
//! id is stable across process restarts once flushed — this is relied on by
//! the barrel offset indices, which key on `Wid`.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::Wid;

#[derive(Debug, Default)]
pub struct Lexicon {
    word_to_wid: HashMap<String, Wid>,
    wid_to_word: HashMap<Wid, String>,
    next_wid: u32,
    /// Words inserted since the last [`Lexicon::flush_appends`], queued for
    /// an append-only write so callers control when they become durable.
    pending: Vec<(String, Wid)>,
}

impl Lexicon {
    /// Load a lexicon file. A missing file yields an empty lexicon with the
    /// counter at zero (§4.2) rather than an error, since an absent lexicon
    /// is the expected state before the very first build.
    pub fn load(path: &Path) -> Result<Self> {
        let mut lex = Lexicon::default();
        let file = match std::fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(lex),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(word), Some(id_str)) = (parts.next(), parts.next()) else {
                continue;
            };
            let Ok(id) = id_str.parse::<u32>() else {
                continue;
            };
            let wid = Wid(id);
            lex.word_to_wid.insert(word.to_string(), wid);
            lex.wid_to_word.insert(wid, word.to_string());
            lex.next_wid = lex.next_wid.max(id);
        }
        Ok(lex)
    }

    pub fn get(&self, word: &str) -> Option<Wid> {
        self.word_to_wid.get(word).copied()
    }

    pub fn word_for(&self, wid: Wid) -> Option<&str> {
        self.wid_to_word.get(&wid).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.word_to_wid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_to_wid.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = (&str, Wid)> {
        self.word_to_wid.iter().map(|(w, id)| (w.as_str(), *id))
    }

    /// Return the existing id for `word`, or assign and queue a new one.
    pub fn get_or_insert(&mut self, word: &str) -> Wid {
        if let Some(wid) = self.word_to_wid.get(word) {
            return *wid;
        }
        self.next_wid += 1;
        let wid = Wid(self.next_wid);
        self.word_to_wid.insert(word.to_string(), wid);
        self.wid_to_word.insert(wid, word.to_string());
        self.pending.push((word.to_string(), wid));
        wid
    }

    /// Append queued insertions to `path` and clear the queue.
    ///
    /// Must be called after a batch of [`Lexicon::get_or_insert`] calls
    /// before any other process can observe the new WIDs on disk (§4.2).
    pub fn flush_appends(&mut self, path: &Path) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for (word, wid) in &self.pending {
            writeln!(file, "{word} {wid}")?;
        }
        file.flush()?;
        self.pending.clear();
        Ok(())
    }
}

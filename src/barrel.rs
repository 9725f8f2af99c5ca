// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Disk-resident inverted index, partitioned into barrels (§4.6).
//!
//! Each barrel `b` is a pair of files: `barrel_b.txt` holds whole posting
//! lines copied verbatim from the inverted index, and `barrel_b.idx` is a
//! sparse `Wid -> byte offset` map pointing at the start of that word's
//! line. Partitioning by `wid % N_BARRELS` keeps any single barrel small
//! enough to seek into cheaply, and the sparse offset index turns a lookup
//! into one seek + one line read instead of a linear scan — the same
//! "directory barrel" idea behind early full-text engines that didn't fit
//! their postings in memory.
//!
//! Readers MUST open a fresh file handle per lookup (§5): barrel text
//! files are externally appendable by the dynamic indexer, and a
//! long-lived handle could miss data appended after it was opened.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;

use crc32fast::Hasher as Crc32Hasher;
use log::warn;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::inverted::{format_inverted_line, parse_inverted_line};
use crate::types::{Edid, InvertedPosting, Occurrence, Wid};

/// In-memory sparse offset index for every barrel, loaded once at startup
/// and shared read-only across query workers (§5).
#[derive(Debug, Default, Clone)]
pub struct BarrelOffsets {
    per_barrel: Vec<HashMap<u32, u64>>,
}

impl BarrelOffsets {
    /// Load every barrel's `.idx` file. Missing idx files are tolerated and
    /// leave that barrel's map empty (§7 "missing file at load time").
    pub fn load(config: &EngineConfig) -> Result<Self> {
        let mut per_barrel = Vec::with_capacity(config.n_barrels as usize);
        for b in 0..config.n_barrels {
            let path = config.barrel_idx_path(b);
            let mut map = HashMap::new();
            match File::open(&path) {
                Ok(file) => {
                    for line in BufReader::new(file).lines() {
                        let line = line?;
                        let mut parts = line.split_whitespace();
                        if let (Some(wid_s), Some(off_s)) = (parts.next(), parts.next()) {
                            if let (Ok(wid), Ok(off)) = (wid_s.parse(), off_s.parse()) {
                                // later entries win: dynamic ingestion appends
                                // a fresh line per insert (§4.8, §9).
                                map.insert(wid, off);
                            }
                        }
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            per_barrel.push(map);
        }
        Ok(BarrelOffsets { per_barrel })
    }

    fn get(&self, barrel: u32, wid: u32) -> Option<u64> {
        self.per_barrel.get(barrel as usize)?.get(&wid).copied()
    }

    fn set(&mut self, barrel: u32, wid: u32, offset: u64) {
        if let Some(map) = self.per_barrel.get_mut(barrel as usize) {
            map.insert(wid, offset);
        }
    }
}

/// Partition a freshly built inverted-index file into `config.n_barrels`
/// barrels (§4.6). Holds all `2 * n_barrels` output handles open for the
/// duration of the build, as the on-disk layout assumes one contiguous
/// write pass per barrel rather than many small reopens.
pub fn build_barrels(config: &EngineConfig, inverted_path: &Path) -> Result<()> {
    crate::config::ensure_layout(&config.barrel_dir())?;

    let mut text_files: Vec<File> = Vec::with_capacity(config.n_barrels as usize);
    let mut idx_files: Vec<File> = Vec::with_capacity(config.n_barrels as usize);
    for b in 0..config.n_barrels {
        text_files.push(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(config.barrel_text_path(b))?,
        );
        idx_files.push(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(config.barrel_idx_path(b))?,
        );
    }

    let input = match File::open(inverted_path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("barrels: inverted index file not found, leaving barrels empty");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for line in BufReader::new(input).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(wid) = line.split_whitespace().next().and_then(|s| s.parse::<u32>().ok())
        else {
            warn!("barrels: skipping line with unparsable leading wid: {line}");
            continue;
        };
        let b = config.barrel_of(wid) as usize;
        let offset = text_files[b].stream_position()?;
        writeln!(idx_files[b], "{wid} {offset}")?;
        writeln!(text_files[b], "{line}")?;
    }

    for f in text_files.iter_mut().chain(idx_files.iter_mut()) {
        f.flush()?;
    }

    for b in 0..config.n_barrels {
        let crc = compute_file_crc32(&config.barrel_text_path(b))?;
        std::fs::write(config.barrel_crc_path(b), format!("{crc:08x}\n"))?;
    }
    Ok(())
}

fn compute_file_crc32(path: &Path) -> Result<u32> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Crc32Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize())
}

/// Recompute a barrel's checksum and compare it against the sidecar written
/// at build time (§9). A mismatch means the barrel text file was truncated
/// or corrupted after the build; ingestion appends are not covered by this
/// check, since they change the file deliberately without updating the
/// sidecar.
pub fn verify_barrel_checksum(config: &EngineConfig, barrel: u32) -> Result<bool> {
    let crc_path = config.barrel_crc_path(barrel);
    let recorded = match std::fs::read_to_string(&crc_path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
    };
    let recorded = u32::from_str_radix(recorded.trim(), 16).unwrap_or(0);
    let actual = compute_file_crc32(&config.barrel_text_path(barrel))?;
    Ok(recorded == actual)
}

/// Fetch the postings for one word (the read path of §4.6).
///
/// Consults the in-memory offset map first; if the indexed offset doesn't
/// point at a line that actually starts with `wid` (stale after a
/// multi-line ingestion append), falls back to a linear scan of the
/// barrel's text file and returns the *first* matching line, per §4.6 and
/// §4.8's note that within-barrel merging across lines is out of scope.
pub fn fetch_postings(
    config: &EngineConfig,
    offsets: &BarrelOffsets,
    wid: Wid,
) -> Result<Option<InvertedPosting>> {
    let barrel = config.barrel_of(wid.0);
    let path = config.barrel_text_path(barrel);
    let mut file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if let Some(offset) = offsets.get(barrel, wid.0) {
        file.seek(SeekFrom::Start(offset))?;
        let mut reader = BufReader::new(&file);
        let mut line = String::new();
        if reader.read_line(&mut line)? > 0 {
            let trimmed = line.trim_end_matches('\n');
            if let Some(posting) = parse_inverted_line(trimmed) {
                if posting.wid == wid {
                    return Ok(Some(posting));
                }
            }
        }
    }

    // Fallback: linear scan, return the first matching line.
    let mut file = File::open(&path)?;
    file.seek(SeekFrom::Start(0))?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(posting) = parse_inverted_line(&line) {
            if posting.wid == wid {
                return Ok(Some(posting));
            }
        }
    }
    Ok(None)
}

/// Append a single new posting line for `wid` to its barrel, recording a
/// fresh offset-index entry that supersedes any prior one for that word in
/// this barrel (§4.8). IDF is written as `0.0` — ingested occurrences are
/// not folded into the corpus-wide document frequency until an offline
/// rebuild (§9).
pub fn append_ingested_posting(
    config: &EngineConfig,
    offsets: &mut BarrelOffsets,
    wid: Wid,
    edid: &Edid,
    occ: Occurrence,
) -> Result<()> {
    let barrel = config.barrel_of(wid.0);
    let text_path = config.barrel_text_path(barrel);
    let idx_path = config.barrel_idx_path(barrel);

    let mut text_file = OpenOptions::new().create(true).append(true).open(&text_path)?;
    let pos = text_file.stream_position()?;
    let line = format_inverted_line(wid, 0.0, &[(edid.clone(), occ)]);
    writeln!(text_file, "{line}")?;
    text_file.flush()?;

    let mut idx_file = OpenOptions::new().create(true).append(true).open(&idx_path)?;
    writeln!(idx_file, "{wid} {pos}")?;
    idx_file.flush()?;

    offsets.set(barrel, wid.0, pos);
    Ok(())
}

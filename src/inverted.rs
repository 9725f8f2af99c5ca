// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! One-pass inversion of the forward index into word-keyed postings (§4.5).
//!
//! This is the classic inverted-index construction step: read every
//! forward posting once, bucket `(edid, tf, mask)` triples by `Wid`, then
//! emit one line per word in ascending `Wid` order with its corpus-wide
//! IDF. Complexity is O(total postings) in both time and memory — there is
//! no external sort, so the whole accumulator lives in RAM during the
//! build (see Zobel & Moffat, "Inverted Files for Text Search Engines",
//! ACM Computing Surveys 2006, §3, for why this is the standard tradeoff
//! for corpora that fit in memory).

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::warn;

use crate::error::Result;
use crate::forward::parse_forward_line;
use crate::types::{Edid, FieldMask, InvertedPosting, Occurrence, Wid};

/// Render one inverted-index line: `<WID> <IDF> : <EDID>(<TF>,<MASK>) …`.
pub fn format_inverted_line(wid: Wid, idf: f64, docs: &[(Edid, Occurrence)]) -> String {
    let body = docs
        .iter()
        .map(|(edid, occ)| format!("{}({},{})", edid, occ.tf, occ.mask.as_u8()))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{wid} {idf} : {body}")
}

/// Parse one inverted-index (or barrel text) line. Malformed posting
/// tokens are skipped without aborting the line, mirroring the forward
/// index's parser (§4.5, §4.6).
pub fn parse_inverted_line(line: &str) -> Option<InvertedPosting> {
    let (head, rest) = line.split_once(" : ")?;
    let mut head_parts = head.split_whitespace();
    let wid: u32 = head_parts.next()?.parse().ok()?;
    let idf: f64 = head_parts.next()?.parse().ok()?;

    let mut docs = Vec::new();
    for token in rest.split_whitespace() {
        let Some(open) = token.find('(') else { continue };
        let Some(close) = token.find(')') else { continue };
        if close < open {
            continue;
        }
        let edid = token[..open].to_string();
        let inner = &token[open + 1..close];
        let Some((tf_str, mask_str)) = inner.split_once(',') else { continue };
        let Ok(tf) = tf_str.parse::<u32>() else { continue };
        let Ok(mask_val) = mask_str.parse::<u8>() else { continue };
        let Some(mask) = FieldMask::from_u8(mask_val) else { continue };
        docs.push((edid, Occurrence { tf, mask }));
    }

    Some(InvertedPosting {
        wid: Wid(wid),
        idf,
        docs,
    })
}

/// Build the inverted index file from a forward-index file (§4.5).
///
/// `total_docs` is `N` in `idf = ln(N / df)`. An unreadable `forward_path`
/// yields an empty output file rather than a fatal error — the component
/// above this one decides whether that's acceptable (§4.5 failure modes).
pub fn build_inverted_index(forward_path: &Path, out_path: &Path, total_docs: u64) -> Result<()> {
    let mut accumulator: BTreeMap<Wid, Vec<(Edid, Occurrence)>> = BTreeMap::new();

    match std::fs::File::open(forward_path) {
        Ok(file) => {
            let reader = BufReader::new(file);
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let Some(posting) = parse_forward_line(&line) else {
                    warn!("inverted-index: skipping unparsable forward line");
                    continue;
                };
                for (wid, occ) in posting.entries {
                    accumulator
                        .entry(wid)
                        .or_default()
                        .push((posting.edid.clone(), occ));
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("inverted-index: forward index file not found, emitting empty inverted index");
        }
        Err(e) => return Err(e.into()),
    }

    let mut out = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(out_path)?;

    for (wid, docs) in &accumulator {
        let df = docs.len() as u64;
        let idf = if df == 0 {
            0.0
        } else {
            (total_docs as f64 / df as f64).ln()
        };
        writeln!(out, "{}", format_inverted_line(*wid, idf, docs))?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn inverted_line_round_trips() {
        let docs = vec![("p1".to_string(), Occurrence { tf: 3, mask: FieldMask::Title })];
        let line = format_inverted_line(Wid(7), 0.6931471805599453, &docs);
        let parsed = parse_inverted_line(&line).unwrap();
        assert_eq!(parsed.wid, Wid(7));
        assert!((parsed.idf - 0.6931471805599453).abs() < 1e-12);
        assert_eq!(parsed.docs, docs);
    }

    #[test]
    fn output_is_sorted_ascending_by_wid() {
        let dir = tempdir().unwrap();
        let forward_path = dir.path().join("forward.txt");
        let out_path = dir.path().join("inverted.txt");
        std::fs::write(
            &forward_path,
            "p1 : 9(1,0) 2(1,0)\np2 : 2(1,0) 9(1,0)\n",
        )
        .unwrap();

        build_inverted_index(&forward_path, &out_path, 2).unwrap();
        let contents = std::fs::read_to_string(&out_path).unwrap();
        let wids: Vec<u32> = contents
            .lines()
            .map(|l| l.split_whitespace().next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(wids, vec![2, 9]);
    }

    #[test]
    fn idf_is_ln_n_over_df() {
        let dir = tempdir().unwrap();
        let forward_path = dir.path().join("forward.txt");
        let out_path = dir.path().join("inverted.txt");
        std::fs::write(&forward_path, "p1 : 1(1,0)\np2 : 1(1,0)\n").unwrap();

        build_inverted_index(&forward_path, &out_path, 2).unwrap();
        let contents = std::fs::read_to_string(&out_path).unwrap();
        let posting = parse_inverted_line(contents.lines().next().unwrap()).unwrap();
        assert!((posting.idf - (2.0_f64 / 2.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn missing_forward_index_yields_empty_output() {
        let dir = tempdir().unwrap();
        let forward_path = dir.path().join("missing.txt");
        let out_path = dir.path().join("inverted.txt");
        build_inverted_index(&forward_path, &out_path, 0).unwrap();
        assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "");
    }
}

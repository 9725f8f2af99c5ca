// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Query execution (§4.7): tokenize, fetch postings in parallel, strict-AND
//! intersect with progressive relaxation, score, rank, hydrate.
//!
//! The intersection strategy is deliberately simple and well understood:
//! seed from the rarest term (fewest documents), prune against each
//! successive term, and if the running set ever empties out, drop the
//! single most common remaining term and start over. This bounds work to
//! roughly the size of the rarest term's posting list in the common case,
//! the same reasoning that motivates sorting postings by length before
//! intersecting them in classic boolean retrieval (Manning, Raghavan,
//! Schütze, "Introduction to Information Retrieval", ch. 1).

use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek, SeekFrom};

use log::{debug, warn};
use rayon::prelude::*;
use serde_json::Value;

use crate::barrel::{fetch_postings, BarrelOffsets};
use crate::config::EngineConfig;
use crate::docmap::DocMap;
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::scoring::occurrence_score;
use crate::tokenizer::tokenize_query;
use crate::types::{Edid, InvertedPosting, SearchHit, Wid};

/// One query term's resolved postings, ready for intersection.
struct TermPostings {
    wid: Wid,
    posting: InvertedPosting,
}

/// Run a full query against the engine's persistent structures and return
/// up to `config.top_k` hydrated, ranked hits.
pub fn search(
    config: &EngineConfig,
    lexicon: &Lexicon,
    offsets: &BarrelOffsets,
    docmap: &DocMap,
    query: &str,
) -> Result<Vec<SearchHit>> {
    let tokens = tokenize_query(query);
    if tokens.is_empty() {
        debug!("search: query tokenized to nothing");
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let wids: Vec<Wid> = tokens
        .iter()
        .filter_map(|t| lexicon.get(t))
        .filter(|wid| seen.insert(*wid))
        .collect();
    if wids.is_empty() {
        debug!("search: no query terms present in lexicon");
        return Ok(Vec::new());
    }

    // Parallel fetch: each term's posting fetch is independent and touches
    // only its own barrel's files (§4.7 step 2, §5).
    let mut terms: Vec<TermPostings> = wids
        .into_par_iter()
        .map(|wid| {
            let posting = fetch_postings(config, offsets, wid).unwrap_or_else(|e| {
                warn!("search: failed to fetch postings for wid {wid}: {e}");
                None
            });
            TermPostings {
                wid,
                posting: posting.unwrap_or_default(),
            }
        })
        .collect();

    // Order by rarity ascending so intersection starts from the smallest list.
    terms.sort_by_key(|t| t.posting.docs.len());

    while !terms.is_empty() {
        if let Some(scored) = try_intersect(config, &terms) {
            if !scored.is_empty() {
                return Ok(hydrate(config, docmap, scored));
            }
        }
        // Drop the most common remaining term (the last after ascending sort)
        // and retry (§4.7 step 4).
        let dropped = terms.pop().unwrap();
        debug!("search: relaxing, dropping term wid={}", dropped.wid);
    }

    Ok(Vec::new())
}

/// Attempt a strict-AND intersection across `terms`, returning a
/// doc -> running-score map, or `None`/empty if the intersection is empty.
fn try_intersect(config: &EngineConfig, terms: &[TermPostings]) -> Option<HashMap<Edid, f64>> {
    let mut iter = terms.iter();
    let first = iter.next()?;

    let mut candidates: HashMap<Edid, f64> = first
        .posting
        .docs
        .iter()
        .take(config.max_docs_per_term)
        .map(|(edid, occ)| {
            (
                edid.clone(),
                occurrence_score(occ.tf, first.posting.idf, occ.mask),
            )
        })
        .collect();

    for term in iter {
        if candidates.is_empty() {
            return Some(candidates);
        }
        let by_edid: HashMap<&Edid, _> = term.posting.docs.iter().map(|(e, o)| (e, o)).collect();
        let mut next = HashMap::with_capacity(candidates.len());
        for (edid, score) in candidates {
            if let Some(occ) = by_edid.get(&edid) {
                let added = occurrence_score(occ.tf, term.posting.idf, occ.mask);
                next.insert(edid, score + added);
            }
        }
        candidates = next;
    }

    Some(candidates)
}

/// Rank candidates descending by score, take the top K, and hydrate each
/// one from the raw corpus via the docmap (§4.7 steps 6-7).
fn hydrate(config: &EngineConfig, docmap: &DocMap, scored: HashMap<Edid, f64>) -> Vec<SearchHit> {
    let mut ranked: Vec<(Edid, f64)> = scored.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(config.top_k);

    let corpus_path = config.corpus_path();
    let mut hits = Vec::with_capacity(ranked.len());
    for (edid, score) in ranked {
        let Some(entry) = docmap.get(&edid) else {
            warn!("search: ranked doc {edid} missing from docmap, skipping");
            continue;
        };
        match read_document(&corpus_path, entry.offset, entry.length) {
            Ok(mut document) => {
                document.insert("relevance_score".to_string(), serde_json::json!(score));
                hits.push(SearchHit { document });
            }
            Err(e) => {
                warn!("search: failed to hydrate {edid}: {e}");
            }
        }
    }
    hits
}

fn read_document(
    corpus_path: &std::path::Path,
    offset: u64,
    length: u64,
) -> Result<serde_json::Map<String, Value>> {
    let mut file = std::fs::File::open(corpus_path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; length as usize];
    file.read_exact(&mut buf)?;
    let value: Value = serde_json::from_str(std::str::from_utf8(&buf).unwrap_or_default())
        .map_err(|source| crate::error::EngineError::MalformedJson { line: 0, source })?;
    match value {
        Value::Object(map) => Ok(map),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("value".to_string(), other);
            Ok(map)
        }
    }
}

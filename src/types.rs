// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the index: identifiers, postings, and field tags.
//!
//! Three identifier spaces exist and must never be confused: `Wid` (word id),
//! `Idid` (internal document id, assigned on first appearance), and `Edid`
//! (external document id, the corpus's own `id` field or a synthesized
//! stand-in). All three are monotonic and never reused once assigned.
//!
//! | Type            | Meaning                                   |
//! |-----------------|--------------------------------------------|
//! | `Wid`            | word id, 1-based, monotonic                |
//! | `Idid`           | internal doc id, 1-based, monotonic        |
//! | `Edid`           | external doc id (opaque string)            |
//! | `FieldMask`      | which field a term occurrence came from    |
//! | `ForwardPosting` | one document's (wid, tf, mask) bag         |
//! | `InvertedPosting`| one word's (edid, tf, mask) occurrence list|

use serde::{Deserialize, Serialize};

/// Word id. Assigned on first encounter of a normalized token, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Wid(pub u32);

impl Wid {
    #[inline]
    pub fn new(id: u32) -> Self {
        Wid(id)
    }
}

impl std::fmt::Display for Wid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal document id. Assigned in order of first appearance in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Idid(pub u32);

impl std::fmt::Display for Idid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External document id: the corpus's `id` field, or a synthesized one.
pub type Edid = String;

/// Which field of a document a term occurrence came from.
///
/// Ordered so that the numeric value doubles as the "more important field
/// wins" tiebreak required by §3: when a term appears in more than one
/// field of a document, the *maximum* `FieldMask` is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FieldMask {
    Abstract = 0,
    Title = 1,
    Authors = 2,
}

impl FieldMask {
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(FieldMask::Abstract),
            1 => Some(FieldMask::Title),
            2 => Some(FieldMask::Authors),
            _ => None,
        }
    }

    /// Combine two masks seen for the same (doc, term) pair, keeping the
    /// higher-priority field per §3.
    #[inline]
    pub fn combine(self, other: FieldMask) -> FieldMask {
        if other.as_u8() > self.as_u8() {
            other
        } else {
            self
        }
    }
}

/// One (word, term-frequency, field) triple within a forward or inverted
/// posting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub tf: u32,
    pub mask: FieldMask,
}

/// A single document's bag of word occurrences, keyed by `Wid`.
///
/// Invariant (§3): each `Wid` appears at most once; `tf >= 1` for every
/// entry. Insertion order is preserved because the forward-index line
/// format emits entries in the order words were first seen in the document.
#[derive(Debug, Clone, Default)]
pub struct ForwardPosting {
    pub edid: Edid,
    pub entries: Vec<(Wid, Occurrence)>,
}

/// One word's full occurrence list plus its corpus-wide IDF.
///
/// `idf = ln(N / df)` at build time (§3); ingestion appends entries with
/// `idf = 0.0` because the true corpus-wide document frequency is not
/// recomputed on every insert (§4.8, §9).
#[derive(Debug, Clone, Default)]
pub struct InvertedPosting {
    pub wid: Wid,
    pub idf: f64,
    pub docs: Vec<(Edid, Occurrence)>,
}

/// A fully hydrated search hit: the original JSON object with
/// `relevance_score` injected in as the score that won it a place in the
/// result set (§4.7 step 7).
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub document: serde_json::Map<String, serde_json::Value>,
}

/// One row of the document map (§4.3): how to find a document's raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocMapEntry {
    pub idid: Idid,
    pub offset: u64,
    pub length: u64,
}

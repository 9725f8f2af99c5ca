// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runtime invariant checks (§3, §9).
//!
//! `debug_assert!`-based, so these are zero-cost in release builds. They
//! exist to catch a broken invariant at the point it's introduced rather
//! than downstream as a confusing query result or a panic three functions
//! away from the actual bug.

use crate::lexicon::Lexicon;
use crate::types::{ForwardPosting, InvertedPosting, Wid};

/// A forward posting has at most one entry per word, and every entry's
/// term frequency is at least 1 (§3).
#[inline]
pub fn check_forward_posting_well_formed(posting: &ForwardPosting) {
    debug_assert!(
        posting.entries.iter().all(|(_, occ)| occ.tf >= 1),
        "forward posting for {} has a zero term frequency",
        posting.edid
    );
    let mut seen = std::collections::HashSet::new();
    debug_assert!(
        posting.entries.iter().all(|(wid, _)| seen.insert(*wid)),
        "forward posting for {} repeats a wid",
        posting.edid
    );
}

/// An inverted posting's document list has at most one entry per external
/// document id (§3): within one word's postings, a document appears once.
#[inline]
pub fn check_inverted_posting_well_formed(posting: &InvertedPosting) {
    let mut seen = std::collections::HashSet::new();
    debug_assert!(
        posting.docs.iter().all(|(edid, _)| seen.insert(edid.clone())),
        "inverted posting for wid {} repeats edid",
        posting.wid
    );
    debug_assert!(posting.idf >= 0.0, "negative idf for wid {}", posting.wid);
}

/// Every `Wid` a caller is about to look up should resolve back to a word
/// the lexicon actually knows, i.e. the lexicon and barrels agree on the
/// id space (§4.2, §4.6).
#[inline]
pub fn check_wid_known(lexicon: &Lexicon, wid: Wid) {
    debug_assert!(
        lexicon.word_for(wid).is_some(),
        "wid {wid} has no corresponding lexicon entry"
    );
}

/// The barrel a word id maps to is always in range (§4.6): the formula
/// `wid % n_barrels` can't itself produce an out-of-range barrel, but a
/// caller passing a stale `n_barrels` after a reconfigure could still get
/// this wrong, so it's worth asserting at the call site.
#[inline]
pub fn check_barrel_in_range(barrel: u32, n_barrels: u32) {
    debug_assert!(barrel < n_barrels, "barrel {barrel} out of range for {n_barrels} barrels");
}

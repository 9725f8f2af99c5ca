// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text normalization (§4.1).
//!
//! Splits on any non-alphanumeric code point, NFC-normalizes and lowercases,
//! then drops anything that isn't purely alphabetic letters or that matches
//! a stopword list. Two distinct stopword sets exist in this system — one
//! for building the index, one for querying it (§9) — so both are exposed
//! here and callers must pick the right one for the phase they're in.

use std::collections::HashSet;
use std::sync::OnceLock;

use unicode_normalization::UnicodeNormalization;

/// Stopwords dropped while building the forward index (§4.1).
pub const BUILD_STOPWORDS: &[&str] = &[
    "the", "and", "is", "in", "at", "of", "on", "for", "to", "a", "an", "that", "it",
];

/// Stopwords dropped while tokenizing a query (§4.7 step 1).
///
/// Deliberately different from [`BUILD_STOPWORDS`]: treated as intentional
/// per the open question in §9, not reconciled into one set.
pub const QUERY_STOPWORDS: &[&str] = &[
    "the", "is", "are", "was", "were", "to", "of", "and", "or", "a", "an", "in", "on", "for",
    "with", "by", "as", "at", "from", "their",
];

fn build_stopword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| BUILD_STOPWORDS.iter().copied().collect())
}

fn query_stopword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| QUERY_STOPWORDS.iter().copied().collect())
}

/// Split `text` on non-alphanumeric boundaries, lowercase, and keep only
/// tokens composed entirely of letters that survive normalization.
///
/// This is the shared first stage for both build-time and query-time
/// tokenization; the stopword filter is applied by the caller via
/// [`tokenize_build`] or [`tokenize_query`] since the two phases disagree on
/// which words are "noise" (§9).
fn raw_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.nfc()
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|tok| !tok.is_empty())
        .filter(|tok| tok.chars().all(|c| c.is_alphabetic()))
        .map(|tok| tok.to_string())
}

/// Tokenize text for indexing, dropping [`BUILD_STOPWORDS`].
pub fn tokenize_build(text: &str) -> Vec<String> {
    let stop = build_stopword_set();
    raw_tokens(text).filter(|tok| !stop.contains(tok.as_str())).collect()
}

/// Tokenize a query string, dropping [`QUERY_STOPWORDS`].
///
/// Per §4.7, query tokenization splits on whitespace rather than on every
/// non-alphanumeric boundary; callers care about keeping apostrophes and
/// punctuation *inside* words out of the result the same way build-time
/// tokenization does, so this still letters-only filters each whitespace
/// chunk rather than treating punctuation as a separate delimiter class.
pub fn tokenize_query(text: &str) -> Vec<String> {
    let stop = query_stopword_set();
    text.nfc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(|chunk| {
            chunk
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
        })
        .filter(|tok| !tok.is_empty())
        .filter(|tok| !stop.contains(tok.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_build_stopwords() {
        let toks = tokenize_build("The Quick and the Dead");
        assert_eq!(toks, vec!["quick", "dead"]);
    }

    #[test]
    fn drops_digits_and_punctuation() {
        let toks = tokenize_build("Rust2024 is great!!");
        // "rust2024" is not purely alphabetic after lowercasing, so it's dropped
        assert_eq!(toks, vec!["great"]);
    }

    #[test]
    fn query_stopwords_differ_from_build_stopwords() {
        assert!(QUERY_STOPWORDS.contains(&"are"));
        assert!(!BUILD_STOPWORDS.contains(&"are"));
    }

    #[test]
    fn tokenize_is_idempotent_on_normalized_input() {
        let text = "quantum entanglement";
        let once = tokenize_build(text).join(" ");
        let twice = tokenize_build(&once).join(" ");
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_query_tokenizes_to_nothing() {
        assert!(tokenize_query("").is_empty());
        assert!(tokenize_query("   ").is_empty());
    }

    #[test]
    fn query_entirely_stopwords_drops_everything() {
        assert!(tokenize_query("the of is").is_empty());
    }
}

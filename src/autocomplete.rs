// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Prefix-based query autocompletion (§4.9).
//!
//! Built once from the lexicon's vocabulary: every word of length >= 3
//! contributes prefixes of length 3..=min(8, word.len()), so a 12-letter
//! word still only ever shows up under its first 8 characters' worth of
//! prefixes. Per-prefix lists are sorted, deduplicated, and capped at 100
//! entries; lookups return at most 18.

use std::collections::HashMap;

use crate::config::{
    MAX_AUTOCOMPLETE_PREFIX, MAX_AUTOCOMPLETE_RESULTS, MAX_SUGGESTIONS_PER_PREFIX,
    MIN_AUTOCOMPLETE_PREFIX, MIN_INDEXED_WORD_LEN,
};
use crate::lexicon::Lexicon;

#[derive(Debug, Default)]
pub struct Autocomplete {
    by_prefix: HashMap<String, Vec<String>>,
}

impl Autocomplete {
    /// Build the prefix index from every word currently in `lexicon`.
    pub fn build(lexicon: &Lexicon) -> Self {
        let mut by_prefix: HashMap<String, Vec<String>> = HashMap::new();
        for (word, _wid) in lexicon.words() {
            if word.chars().count() < MIN_INDEXED_WORD_LEN {
                continue;
            }
            let chars: Vec<char> = word.chars().collect();
            let max_len = chars.len().min(MAX_AUTOCOMPLETE_PREFIX);
            for len in MIN_AUTOCOMPLETE_PREFIX..=max_len {
                let prefix: String = chars[..len].iter().collect();
                by_prefix.entry(prefix).or_default().push(word.to_string());
            }
        }
        for list in by_prefix.values_mut() {
            list.sort();
            list.dedup();
            list.truncate(MAX_SUGGESTIONS_PER_PREFIX);
        }
        Autocomplete { by_prefix }
    }

    /// Record a single newly ingested word (§4.8's dynamic indexer calls
    /// this instead of rebuilding the whole structure per document).
    pub fn insert_word(&mut self, word: &str) {
        if word.chars().count() < MIN_INDEXED_WORD_LEN {
            return;
        }
        let chars: Vec<char> = word.chars().collect();
        let max_len = chars.len().min(MAX_AUTOCOMPLETE_PREFIX);
        for len in MIN_AUTOCOMPLETE_PREFIX..=max_len {
            let prefix: String = chars[..len].iter().collect();
            let list = self.by_prefix.entry(prefix).or_default();
            if let Err(pos) = list.binary_search(&word.to_string()) {
                list.insert(pos, word.to_string());
                list.truncate(MAX_SUGGESTIONS_PER_PREFIX);
            }
        }
    }

    /// Look up suggestions for `input`, normalized to lowercase letters.
    /// Inputs shorter than [`MIN_AUTOCOMPLETE_PREFIX`] always return empty
    /// (§4.9, §8).
    pub fn suggest(&self, input: &str) -> Vec<String> {
        let normalized: String = input
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphabetic())
            .collect();
        if normalized.chars().count() < MIN_AUTOCOMPLETE_PREFIX {
            return Vec::new();
        }
        self.by_prefix
            .get(&normalized)
            .map(|list| list.iter().take(MAX_AUTOCOMPLETE_RESULTS).cloned().collect())
            .unwrap_or_default()
    }
}

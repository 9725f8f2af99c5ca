// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Terminal output helpers for the `scholar-search` CLI: plain, readable
//! tables rather than anything that needs a color-capable terminal.

use crate::types::SearchHit;

pub fn section(label: &str) {
    println!("── {label} ──");
}

pub fn row(content: &str) {
    println!("{content}");
}

pub fn pad_right(s: &str, width: usize) -> String {
    if s.len() >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - s.len()))
    }
}

/// Print a ranked list of search hits as a simple table: rank, score, title
/// (falling back to the document's `id` if it has no `title` field).
pub fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        row("No results.");
        return;
    }
    section(&format!("RESULTS ({})", hits.len()));
    for (i, hit) in hits.iter().enumerate() {
        let title = hit
            .document
            .get("title")
            .and_then(|v| v.as_str())
            .or_else(|| hit.document.get("id").and_then(|v| v.as_str()))
            .unwrap_or("(untitled)");
        let score = hit.document.get("relevance_score").and_then(|v| v.as_f64()).unwrap_or(0.0);
        row(&format!("{:>3}. {}  {}", i + 1, pad_right(&format!("{score:.3}"), 8), title));
    }
}

/// Print autocomplete suggestions, one per line.
pub fn print_suggestions(words: &[String]) {
    if words.is_empty() {
        row("No suggestions.");
        return;
    }
    for word in words {
        row(word);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_right_extends_short_strings() {
        assert_eq!(pad_right("ab", 5), "ab   ");
    }

    #[test]
    fn pad_right_leaves_long_strings_untouched() {
        assert_eq!(pad_right("abcdef", 3), "abcdef");
    }
}

// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Forward index: per-document bags of (word, term-frequency, field) (§4.4).
//!
//! The forward index is the bridge between raw JSON documents and the
//! word-id space: this module tags each of a document's text fields,
//! tokenizes them, and folds the result into one `<EDID> :
//! <WID>(<TF>,<MASK>) …` line per document. [`crate::inverted`] then inverts
//! these lines into word-keyed postings.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::warn;
use serde_json::Value;

use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::tokenizer::tokenize_build;
use crate::types::{Edid, FieldMask, ForwardPosting, Occurrence, Wid};

/// Pull the four text fields out of a document JSON value, tagged with the
/// field each came from. `authors_parsed` is an array of `[last, first,
/// suffix?]` string arrays (§4.4); the optional third element is included
/// when present and a string, per the open question resolved in §9.
pub fn field_texts(doc: &Value) -> Vec<(String, FieldMask)> {
    let mut out = Vec::new();
    if let Some(title) = doc.get("title").and_then(Value::as_str) {
        out.push((title.to_string(), FieldMask::Title));
    }
    if let Some(abs) = doc.get("abstract").and_then(Value::as_str) {
        out.push((abs.to_string(), FieldMask::Abstract));
    }
    if let Some(submitter) = doc.get("submitter").and_then(Value::as_str) {
        out.push((submitter.to_string(), FieldMask::Authors));
    }
    if let Some(authors) = doc.get("authors_parsed").and_then(Value::as_array) {
        for author in authors {
            if let Some(parts) = author.as_array() {
                let mut name = String::new();
                for (i, part) in parts.iter().enumerate() {
                    if i > 2 {
                        break;
                    }
                    if let Some(s) = part.as_str() {
                        if !name.is_empty() {
                            name.push(' ');
                        }
                        name.push_str(s);
                    }
                }
                if !name.is_empty() {
                    out.push((name, FieldMask::Authors));
                }
            }
        }
    }
    out
}

/// Tokenize a document's tagged fields and fold them into one ordered bag
/// of (wid, tf, mask), allocating new word ids from `lexicon` as needed.
/// Within one document a word's mask is the maximum over all fields it
/// appeared in (§3).
pub fn accumulate_occurrences(
    lexicon: &mut Lexicon,
    fields: &[(String, FieldMask)],
) -> Vec<(Wid, Occurrence)> {
    let mut order: Vec<Wid> = Vec::new();
    let mut by_wid: HashMap<Wid, Occurrence> = HashMap::new();

    for (text, mask) in fields {
        for token in tokenize_build(text) {
            let wid = lexicon.get_or_insert(&token);
            match by_wid.get_mut(&wid) {
                Some(occ) => {
                    occ.tf += 1;
                    occ.mask = occ.mask.combine(*mask);
                }
                None => {
                    by_wid.insert(wid, Occurrence { tf: 1, mask: *mask });
                    order.push(wid);
                }
            }
        }
    }

    order
        .into_iter()
        .map(|wid| (wid, by_wid[&wid]))
        .collect()
}

/// Render one forward-index line: `<EDID> : <WID>(<TF>,<MASK>) …`.
pub fn format_forward_line(edid: &str, entries: &[(Wid, Occurrence)]) -> String {
    let body = entries
        .iter()
        .map(|(wid, occ)| format!("{}({},{})", wid, occ.tf, occ.mask.as_u8()))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{edid} : {body}")
}

/// Parse one forward-index line back into a [`ForwardPosting`].
///
/// Malformed tokens are skipped and the rest of the line is still parsed
/// (§4.5's "the containing line continues" failure mode, which this parser
/// shares with the inverted-index builder).
pub fn parse_forward_line(line: &str) -> Option<ForwardPosting> {
    let (edid, rest) = line.split_once(" : ")?;
    let mut entries = Vec::new();
    for token in rest.split_whitespace() {
        if let Some((wid, occ)) = parse_posting_token(token) {
            entries.push((wid, occ));
        }
    }
    Some(ForwardPosting {
        edid: edid.to_string(),
        entries,
    })
}

/// Parse a single `<WID>(<TF>,<MASK>)` token. Returns `None` on any
/// structural problem (missing paren, missing comma, non-numeric field)
/// rather than failing the whole line.
pub fn parse_posting_token(token: &str) -> Option<(Wid, Occurrence)> {
    let open = token.find('(')?;
    let close = token.find(')')?;
    if close < open {
        return None;
    }
    let wid: u32 = token[..open].parse().ok()?;
    let inner = &token[open + 1..close];
    let (tf_str, mask_str) = inner.split_once(',')?;
    let tf: u32 = tf_str.parse().ok()?;
    let mask_val: u8 = mask_str.parse().ok()?;
    let mask = FieldMask::from_u8(mask_val)?;
    Some((Wid(wid), Occurrence { tf, mask }))
}

/// Build the forward index from scratch by streaming the raw corpus line
/// by line (§4.4). Documents that fail to parse as JSON are skipped
/// silently; documents without an `id` get a synthesized `"Unassigned<k>"`
/// external id distinct from the dynamic indexer's `"new<k>"` scheme.
pub fn build_forward_index(
    corpus_path: &Path,
    lexicon: &mut Lexicon,
    lexicon_path: &Path,
    out_path: &Path,
) -> Result<()> {
    let file = std::fs::File::open(corpus_path)?;
    let reader = BufReader::new(file);
    let mut out = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(out_path)?;

    let mut unassigned = 0u32;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => {
                warn!("forward-index: skipping unparsable document");
                continue;
            }
        };
        let edid: Edid = doc
            .get("id")
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .unwrap_or_else(|| {
                unassigned += 1;
                format!("Unassigned{unassigned}")
            });
        let fields = field_texts(&doc);
        let entries = accumulate_occurrences(lexicon, &fields);
        writeln!(out, "{}", format_forward_line(&edid, &entries))?;
    }
    out.flush()?;
    lexicon.flush_appends(lexicon_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posting_token_round_trips() {
        let entries = vec![(Wid(3), Occurrence { tf: 2, mask: FieldMask::Title })];
        let line = format_forward_line("p1", &entries);
        assert_eq!(line, "p1 : 3(2,1)");

        let parsed = parse_forward_line(&line).unwrap();
        assert_eq!(parsed.edid, "p1");
        assert_eq!(parsed.entries, entries);
    }

    #[test]
    fn malformed_token_is_skipped_not_fatal() {
        let line = "p1 : 3(2,1) garbage 5(1,0)";
        let parsed = parse_forward_line(line).unwrap();
        assert_eq!(parsed.entries.len(), 2);
    }

    #[test]
    fn field_texts_includes_authors_parsed_with_optional_suffix() {
        let doc: Value = serde_json::from_str(
            r#"{"authors_parsed":[["Doe","Alice","Jr"],["Smith","Bob"]]}"#,
        )
        .unwrap();
        let fields = field_texts(&doc);
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|(_, mask)| *mask == FieldMask::Authors));
        assert_eq!(fields[0].0, "Doe Alice Jr");
        assert_eq!(fields[1].0, "Smith Bob");
    }

    #[test]
    fn repeated_word_across_fields_keeps_max_mask_and_sums_tf() {
        let mut lex = Lexicon::default();
        let fields = vec![
            ("quantum systems".to_string(), FieldMask::Abstract),
            ("quantum entanglement".to_string(), FieldMask::Title),
        ];
        let entries = accumulate_occurrences(&mut lex, &fields);
        let quantum_wid = lex.get("quantum").unwrap();
        let (_, occ) = entries.iter().find(|(w, _)| *w == quantum_wid).unwrap();
        assert_eq!(occ.tf, 2);
        assert_eq!(occ.mask, FieldMask::Title);
    }
}

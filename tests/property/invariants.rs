//! Properties from the testable-properties list: tokenizer idempotence,
//! DocMap offset/length round-tripping, and barrel-formula consistency,
//! checked across randomly generated corpora rather than one fixed example.

use proptest::prelude::*;
use scholar_search::tokenizer::tokenize_build;

use crate::common::build_index;

proptest! {
    /// Re-tokenizing already-tokenized text is a no-op: `tokenize(tokenize(text)) = tokenize(text)`.
    #[test]
    fn tokenize_build_is_idempotent(words in proptest::collection::vec("[a-z]{1,12}", 0..20)) {
        let text = words.join(" ");
        let once = tokenize_build(&text);
        let twice = tokenize_build(&once.join(" "));
        prop_assert_eq!(once, twice);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// For every DocMap entry, seeking to `offset` and reading `length`
    /// bytes out of the corpus file yields a JSON object whose `id`
    /// matches the edid it was recorded under.
    #[test]
    fn docmap_offsets_resolve_to_matching_document_ids(
        titles in proptest::collection::vec("[a-z]{3,10}", 1..15)
    ) {
        let lines: Vec<String> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| format!(r#"{{"id":"doc{i}","title":"{title}"}}"#))
            .collect();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let built = build_index(&line_refs);

        let config = built.engine.config();
        let corpus = std::fs::read(config.corpus_path()).unwrap();
        let docmap = scholar_search::docmap::DocMap::load(&config.docmap_path()).unwrap();
        for i in 0..titles.len() {
            let edid = format!("doc{i}");
            let Some(entry) = docmap.get(&edid) else { continue };
            let slice = &corpus[entry.offset as usize..(entry.offset + entry.length) as usize];
            let parsed: serde_json::Value = serde_json::from_slice(slice).unwrap();
            prop_assert_eq!(parsed["id"].as_str().unwrap(), edid);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Every WID present in a built index's barrels lands in `wid % n_barrels`,
    /// regardless of how many distinct words the corpus happens to contain.
    #[test]
    fn every_barrel_wid_satisfies_modulo_formula(
        word_count in 1usize..120
    ) {
        let lines: Vec<String> = (0..word_count)
            .map(|i| format!(r#"{{"id":"doc{i}","title":"{}"}}"#, crate::common::synthetic_word(i)))
            .collect();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let built = build_index(&line_refs);
        let config = built.engine.config();

        for barrel in 0..config.n_barrels {
            let idx_path = config.barrel_idx_path(barrel);
            let Ok(contents) = std::fs::read_to_string(&idx_path) else { continue };
            for line in contents.lines() {
                let Some(wid) = line.split_whitespace().next().and_then(|s| s.parse::<u32>().ok()) else {
                    continue;
                };
                prop_assert_eq!(wid % config.n_barrels, barrel);
            }
        }
    }
}

//! End-to-end scenarios, built from a fresh index each time rather than
//! shared fixtures, so one test's corpus can't leak into another's.

use crate::common::{build_index, synthetic_word};

/// Scenario 2: a query composed entirely of stopwords returns no hits,
/// regardless of what the corpus actually contains.
#[test]
fn stopword_only_query_returns_no_hits() {
    let built = build_index(&[
        r#"{"id":"p1","title":"quantum entanglement","abstract":"We study quantum systems."}"#,
    ]);
    let hits = built.engine.search("the of is").unwrap();
    assert!(hits.is_empty());
}

/// Scenario 5: barrel partitioning. 250 documents, each introducing exactly
/// one new word in doc order, land at WIDs 1..=250, and every barrel's idx
/// file lists exactly the WIDs that satisfy `wid % 100 == barrel`.
#[test]
fn barrel_partitioning_matches_modulo_formula_across_250_wids() {
    let lines: Vec<String> = (0..250)
        .map(|i| format!(r#"{{"id":"p{i}","title":"{}"}}"#, synthetic_word(i)))
        .collect();
    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let built = build_index(&line_refs);

    let config = built.engine.config();
    for barrel in 0..config.n_barrels {
        let idx_path = config.barrel_idx_path(barrel);
        let contents = std::fs::read_to_string(&idx_path).unwrap_or_default();
        let wids_in_barrel: Vec<u32> = contents
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .filter_map(|s| s.parse::<u32>().ok())
            .collect();
        for wid in &wids_in_barrel {
            assert_eq!(wid % config.n_barrels, barrel, "wid {wid} filed under barrel {barrel}");
        }
    }

    // barrel 0 holds wid 100 and 200 (the only multiples of 100 in 1..=250)
    let barrel0 = std::fs::read_to_string(config.barrel_idx_path(0)).unwrap();
    let wids0: std::collections::HashSet<u32> = barrel0
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .filter_map(|s| s.parse().ok())
        .collect();
    assert!(wids0.contains(&100));
    assert!(wids0.contains(&200));

    // barrel 1 holds wid 1, 101, 201
    let barrel1 = std::fs::read_to_string(config.barrel_idx_path(1)).unwrap();
    let wids1: std::collections::HashSet<u32> = barrel1
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .filter_map(|s| s.parse().ok())
        .collect();
    assert!(wids1.contains(&1));
    assert!(wids1.contains(&101));
    assert!(wids1.contains(&201));
}

/// Scenario 6: autocomplete prefix ordering across a small vocabulary.
#[test]
fn autocomplete_orders_matches_lexicographically() {
    let built = build_index(&[r#"{"id":"p1","title":"quantum quark query quad"}"#]);

    assert!(built.engine.suggest("qu").is_empty());
    assert_eq!(
        built.engine.suggest("qua"),
        vec!["quad".to_string(), "quantum".to_string(), "quark".to_string()]
    );
}

/// Scenario 3 end to end: relaxation drops the most common remaining term
/// until the intersection of what's left succeeds.
#[test]
fn relaxation_returns_the_surviving_document() {
    let built = build_index(&[
        r#"{"id":"p1","title":"graph neural"}"#,
        r#"{"id":"p2","title":"neural network"}"#,
    ]);
    let hits = built.engine.search("graph neural network").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document["id"], "p1");
}

/// Scenario 4 end to end: a document ingested via `Engine::add_document`
/// is searchable without reopening or rebuilding, and its EDID is
/// synthesized with the `"new"` prefix since it arrived without its own id.
#[test]
fn ingested_document_without_id_is_searchable_with_synthesized_edid() {
    let built = build_index(&[r#"{"id":"p1","title":"existing paper"}"#]);
    let doc = serde_json::json!({"title": "novel protocol", "abstract": "x"});
    let edid = built.engine.add_document(doc).unwrap();
    assert!(edid.starts_with("new"));

    let hits = built.engine.search("novel").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document["id"], edid);
}

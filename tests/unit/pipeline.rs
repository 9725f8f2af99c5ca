use scholar_search::config::EngineConfig;
use scholar_search::docmap::DocMap;
use scholar_search::lexicon::Lexicon;
use scholar_search::{barrel, forward, inverted};
use tempfile::tempdir;

/// Build each stage by hand (docmap, lexicon + forward index, inverted
/// index, barrels) and check the state each one leaves behind before
/// handing off to the next, rather than only checking the end-to-end
/// query result the way the integration tests do.
#[test]
fn pipeline_stages_hand_off_correctly() {
    let dir = tempdir().unwrap();
    let mut config = EngineConfig::new(dir.path());
    config.n_barrels = 8;
    scholar_search::config::ensure_layout(&config.barrel_dir()).unwrap();

    std::fs::write(
        &config.corpus_path(),
        concat!(
            r#"{"id":"p1","title":"quantum entanglement","abstract":"study of quantum systems"}"#,
            "\n",
            r#"{"id":"p2","title":"classical mechanics","abstract":"newtonian systems"}"#,
            "\n",
        ),
    )
    .unwrap();

    // Stage 1: docmap.
    let docmap = DocMap::build(&config.corpus_path(), &config.docmap_path()).unwrap();
    assert_eq!(docmap.len(), 2);
    let p1 = docmap.get("p1").unwrap();
    let raw = std::fs::read(config.corpus_path()).unwrap();
    let slice = &raw[p1.offset as usize..(p1.offset + p1.length) as usize];
    let parsed: serde_json::Value = serde_json::from_slice(slice).unwrap();
    assert_eq!(parsed["id"], "p1");

    // Stage 2: lexicon + forward index.
    let mut lexicon = Lexicon::load(&config.lexicon_path()).unwrap();
    forward::build_forward_index(
        &config.corpus_path(),
        &mut lexicon,
        &config.lexicon_path(),
        &config.forward_index_path(),
    )
    .unwrap();
    assert!(lexicon.get("quantum").is_some());
    assert!(lexicon.get("systems").is_some());
    // stopwords never make it into the lexicon
    assert!(lexicon.get("of").is_none());

    let forward_text = std::fs::read_to_string(config.forward_index_path()).unwrap();
    assert!(forward_text.lines().any(|l| l.starts_with("p1 :")));
    assert!(forward_text.lines().any(|l| l.starts_with("p2 :")));

    // Stage 3: inverted index, sorted ascending by wid.
    inverted::build_inverted_index(
        &config.forward_index_path(),
        &config.inverted_index_path(),
        docmap.len() as u64,
    )
    .unwrap();
    let inverted_text = std::fs::read_to_string(config.inverted_index_path()).unwrap();
    let wids: Vec<u32> = inverted_text
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .filter_map(|s| s.parse().ok())
        .collect();
    let mut sorted = wids.clone();
    sorted.sort_unstable();
    assert_eq!(wids, sorted, "inverted index lines must be sorted ascending by wid");

    let quantum_wid = lexicon.get("quantum").unwrap();
    let quantum_line = inverted_text
        .lines()
        .find(|l| l.starts_with(&format!("{quantum_wid} ")))
        .unwrap();
    // "quantum" occurs in p1's title and abstract, merged into one posting
    // with tf=2 rather than appearing as two separate entries for p1.
    assert!(quantum_line.contains("p1(2,"));

    // Stage 4: barrels.
    barrel::build_barrels(&config, &config.inverted_index_path()).unwrap();
    let offsets = barrel::BarrelOffsets::load(&config).unwrap();
    let posting = barrel::fetch_postings(&config, &offsets, quantum_wid).unwrap().unwrap();
    assert_eq!(posting.docs[0].0, "p1");
    assert!(barrel::verify_barrel_checksum(&config, config.barrel_of(quantum_wid.0)).unwrap());
}

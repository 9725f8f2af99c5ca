//! Shared test fixtures: building a throwaway index from inline JSONL.

#![allow(dead_code)]

use std::path::PathBuf;

use scholar_search::engine::Engine;
use tempfile::TempDir;

/// A built index plus the `TempDir` that owns its files; drop order keeps
/// the directory alive as long as the `Engine` handle does.
pub struct BuiltIndex {
    pub engine: Engine,
    _dir: TempDir,
}

/// Write `corpus_lines` (each a JSON document) as a JSONL file and build an
/// index from it in a fresh temp directory.
pub fn build_index(corpus_lines: &[&str]) -> BuiltIndex {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = dir.path().join("corpus.jsonl");
    std::fs::write(&corpus_path, corpus_lines.join("\n")).unwrap();
    let index_dir = dir.path().join("index");
    Engine::build(&index_dir, &corpus_path).unwrap();
    let engine = Engine::open(&index_dir).unwrap();
    BuiltIndex { engine, _dir: dir }
}

/// A unique, lowercase, purely-alphabetic word for index `n`, guaranteed
/// not to collide with any build- or query-time stopword.
pub fn synthetic_word(n: usize) -> String {
    let first = (b'a' + (n / 26) as u8) as char;
    let second = (b'a' + (n % 26) as u8) as char;
    format!("zz{first}{second}")
}

pub fn index_dir_of(built: &BuiltIndex) -> PathBuf {
    built.engine.config().index_dir.clone()
}

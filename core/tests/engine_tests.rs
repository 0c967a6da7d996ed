use notesearch_core::scanner::{ScanOptions, Scanner};
use notesearch_core::tokenizer::tokenize;
use notesearch_core::{NoteIndex, SearchResult};
use std::collections::{HashMap, HashSet};
use std::fs;
use tempfile::tempdir;

const CORPUS: &[(&str, &str)] = &[
    ("notes/rust.md", "Rust is a systems programming language. Rust has ownership."),
    ("notes/python.md", "Python is a dynamic programming language with a GIL."),
    ("notes/cooking.txt", "Pasta needs salt, water and patience. A little olive oil."),
    ("src/lib.rs", "pub fn ownership() { /* rust borrow checker */ }"),
    ("empty.txt", ""),
];

fn build() -> NoteIndex {
    let mut notes = NoteIndex::new();
    notes.add_all(CORPUS.iter().map(|(p, c)| (*p, c.to_string())));
    notes
}

#[test]
fn term_frequencies_sum_to_token_count() {
    let notes = build();
    let mut per_doc: HashMap<u32, u64> = HashMap::new();
    for term in notes.index().terms() {
        for p in notes.get_postings(term).unwrap() {
            *per_doc.entry(p.doc_id).or_default() += p.term_freq as u64;
        }
    }
    for doc in notes.store().documents() {
        let expected = tokenize(&doc.content).len() as u64;
        assert_eq!(per_doc.get(&doc.id).copied().unwrap_or(0), expected, "doc {}", doc.path);
    }
}

#[test]
fn document_frequency_matches_distinct_docs() {
    let notes = build();
    for term in notes.index().terms() {
        let postings = notes.get_postings(term).unwrap();
        let distinct: HashSet<u32> = postings.iter().map(|p| p.doc_id).collect();
        assert_eq!(distinct.len(), postings.len());
        assert_eq!(notes.get_document_frequency(term), distinct.len());
        assert!(postings.iter().all(|p| p.term_freq >= 1));
    }
}

#[test]
fn multi_term_query_is_conjunctive() {
    let notes = build();
    let results = notes.search("programming language", 0);
    let paths: HashSet<&str> = results.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, HashSet::from(["notes/rust.md", "notes/python.md"]));

    let results = notes.search("rust ownership", 0);
    let paths: Vec<&str> = results.iter().map(|r| r.path.as_str()).collect();
    // rust.md repeats "rust", so it outranks lib.rs
    assert_eq!(paths, vec!["notes/rust.md", "src/lib.rs"]);
}

#[test]
fn unknown_term_vetoes_the_query() {
    let notes = build();
    assert!(notes.search("rust javascript", 0).is_empty());
}

#[test]
fn scores_are_non_increasing() {
    let notes = build();
    let results: Vec<SearchResult> = notes.search("is", 0);
    assert_eq!(results.len(), 2);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn clear_then_reuse() {
    let mut notes = build();
    notes.clear();
    assert_eq!(notes.size(), 0);
    assert_eq!(notes.vocabulary_size(), 0);
    assert_eq!(notes.add("again.txt", "fresh start".into()), 0);
    assert_eq!(notes.search("fresh", 0)[0].path, "again.txt");
}

#[test]
fn scan_and_index_directory() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("b.md"), "Second note about tokio").unwrap();
    fs::write(dir.path().join("a.txt"), "First note about axum").unwrap();
    fs::write(dir.path().join("sub/c.rs"), "fn main() { tokio::spawn(axum) }").unwrap();
    fs::write(dir.path().join("skip.png"), "not text").unwrap();
    fs::write(dir.path().join("blank.txt"), "").unwrap();

    let mut scanner = Scanner::new(ScanOptions::default());
    let files = scanner.scan(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["a.txt", "b.md", "sub/c.rs"]);

    let stats = scanner.last_stats();
    assert_eq!(stats.files_scanned, 5);
    assert_eq!(stats.files_indexed, 3);
    assert!(stats.total_bytes > 0);

    let mut notes = NoteIndex::new();
    notes.add_all(files.into_iter().map(|f| (f.path.to_string_lossy().into_owned(), f.content)));
    let hits = notes.search("tokio axum", 0);
    assert_eq!(hits.len(), 1);
    assert!(hits[0].path.ends_with("c.rs"));
}

#[test]
fn search_results_serialize() {
    let notes = build();
    let results = notes.search("pasta", 1);
    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json[0]["path"], "notes/cooking.txt");
    assert!(json[0]["snippet"].as_str().unwrap().starts_with("Pasta"));
}

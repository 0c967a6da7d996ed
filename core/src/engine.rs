use crate::index::{InvertedIndex, Posting};
use crate::search::{SearchEngine, SearchPage, SearchResult};
use crate::store::{Document, DocumentStore};
use crate::tokenizer::tokenize;
use crate::DocId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub vocabulary: usize,
    pub tokens: u64,
}

/// Owns a document store and the inverted index built over it.
///
/// Both halves are only mutated together, so every doc id held by the index
/// resolves in the store.
#[derive(Debug, Default)]
pub struct NoteIndex {
    store: DocumentStore,
    index: InvertedIndex,
}

impl NoteIndex {
    pub fn new() -> Self { Self::default() }

    /// Store `content` under `path` and index its tokens.
    pub fn add(&mut self, path: impl Into<String>, content: String) -> DocId {
        let tokens = tokenize(&content);
        let doc_id = self.store.add_document(path, content);
        self.index.index_document(doc_id, &tokens);
        doc_id
    }

    pub fn add_all<P, I>(&mut self, docs: I) -> usize
    where
        P: Into<String>,
        I: IntoIterator<Item = (P, String)>,
    {
        let mut added = 0;
        for (path, content) in docs {
            self.add(path, content);
            added += 1;
        }
        tracing::info!(num_docs = self.store.size(), num_terms = self.index.vocabulary_size(), added, "indexed documents");
        added
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.index.clear();
        tracing::debug!("index cleared");
    }

    pub fn searcher(&self) -> SearchEngine<'_> {
        SearchEngine::new(&self.index, &self.store)
    }

    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        self.searcher().search(query, max_results)
    }

    pub fn search_page(&self, query: &str, max_results: usize) -> SearchPage {
        self.searcher().search_page(query, max_results)
    }

    pub fn get_document(&self, doc_id: DocId) -> Option<&Document> {
        self.store.get_document(doc_id)
    }

    pub fn get_postings(&self, term: &str) -> Option<&[Posting]> {
        self.index.get_postings(term)
    }

    pub fn get_document_frequency(&self, term: &str) -> usize {
        self.index.get_document_frequency(term)
    }

    pub fn size(&self) -> usize { self.store.size() }

    pub fn is_empty(&self) -> bool { self.store.empty() }

    pub fn vocabulary_size(&self) -> usize { self.index.vocabulary_size() }

    pub fn store(&self) -> &DocumentStore { &self.store }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.store.size(),
            vocabulary: self.index.vocabulary_size(),
            tokens: self.index.total_term_occurrences(),
        }
    }
}

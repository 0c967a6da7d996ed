use crate::DocId;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_freq: u32, // always >= 1
}

/// Term -> postings, one posting per document that contains the term.
///
/// Terms are matched exactly; normalization belongs to the tokenizer.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>, // appended in doc_id order
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record the term frequencies of one document.
    ///
    /// Callers pass strictly increasing `doc_id`s so that every posting list
    /// stays sorted by document.
    pub fn index_document<S: AsRef<str>>(&mut self, doc_id: DocId, tokens: &[S]) {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_ref()).or_insert(0) += 1;
        }
        for (term, term_freq) in counts {
            self.postings
                .entry(term.to_string())
                .or_default()
                .push(Posting { doc_id, term_freq });
        }
    }

    pub fn get_postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn get_document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    pub fn vocabulary_size(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn sorted_terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.terms().collect();
        terms.sort_unstable();
        terms
    }

    /// Sum of term frequencies across every posting.
    pub fn total_term_occurrences(&self) -> u64 {
        self.postings
            .values()
            .flat_map(|list| list.iter())
            .map(|p| p.term_freq as u64)
            .sum()
    }

    pub fn clear(&mut self) {
        self.postings.clear();
    }
}

use crate::index::InvertedIndex;
use crate::snippet::extract_snippet;
use crate::store::DocumentStore;
use crate::tokenizer::tokenize;
use crate::DocId;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub path: String,
    pub score: f64,
    pub snippet: String,
}

/// A truncated result list plus the number of documents that matched.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub total_hits: usize,
    pub results: Vec<SearchResult>,
}

/// Read-only query processor over an index and the store it was built from.
///
/// Queries use strict AND semantics: a document is a candidate only if it
/// contains every distinct query term. Candidates are ranked by the sum of
/// `(1 + ln tf) * ln(N / df)` over the query terms, highest first, with ties
/// broken by ascending document id.
#[derive(Clone, Copy)]
pub struct SearchEngine<'a> {
    index: &'a InvertedIndex,
    store: &'a DocumentStore,
}

impl<'a> SearchEngine<'a> {
    pub fn new(index: &'a InvertedIndex, store: &'a DocumentStore) -> Self {
        Self { index, store }
    }

    /// Ranked results for `query`; `max_results == 0` returns every match.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        self.search_page(query, max_results).results
    }

    pub fn search_page(&self, query: &str, max_results: usize) -> SearchPage {
        let terms = query_terms(query);
        if terms.is_empty() {
            return SearchPage::default();
        }

        let mut ranked = self.rank(&terms);
        let total_hits = ranked.len();
        if max_results > 0 {
            ranked.truncate(max_results);
        }

        let results: Vec<SearchResult> = ranked
            .into_iter()
            .filter_map(|(doc_id, score)| {
                let doc = self.store.get_document(doc_id)?;
                Some(SearchResult {
                    doc_id,
                    path: doc.path.clone(),
                    score,
                    snippet: extract_snippet(&doc.content, &terms),
                })
            })
            .collect();
        tracing::debug!(query, terms = terms.len(), total_hits, returned = results.len(), "search");
        SearchPage { total_hits, results }
    }

    /// Score every document containing all of `terms`, best first.
    pub fn rank(&self, terms: &[String]) -> Vec<(DocId, f64)> {
        let mut per_term: Vec<(f64, HashMap<DocId, u32>)> = Vec::with_capacity(terms.len());
        for term in terms {
            let Some(postings) = self.index.get_postings(term) else {
                return Vec::new();
            };
            let freqs: HashMap<DocId, u32> =
                postings.iter().map(|p| (p.doc_id, p.term_freq)).collect();
            per_term.push((inverse_df(postings.len(), self.store.size()), freqs));
        }

        let Some(((_, first), rest)) = per_term.split_first() else {
            return Vec::new();
        };
        let mut candidates: BTreeSet<DocId> = first.keys().copied().collect();
        for (_, freqs) in rest {
            candidates.retain(|doc_id| freqs.contains_key(doc_id));
            if candidates.is_empty() {
                return Vec::new();
            }
        }

        let mut scored: Vec<(DocId, f64)> = candidates
            .into_iter()
            .map(|doc_id| {
                let score: f64 = per_term
                    .iter()
                    .map(|(idf, freqs)| dampened_tf(freqs.get(&doc_id).copied().unwrap_or(0)) * idf)
                    .sum();
                (doc_id, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored
    }

    /// Log-dampened term frequency of `term` in `doc_id`, or 0 when absent.
    pub fn tf(&self, term: &str, doc_id: DocId) -> f64 {
        let freq = self
            .index
            .get_postings(term)
            .and_then(|list| list.iter().find(|p| p.doc_id == doc_id))
            .map_or(0, |p| p.term_freq);
        dampened_tf(freq)
    }

    pub fn idf(&self, term: &str) -> f64 {
        inverse_df(self.index.get_document_frequency(term), self.store.size())
    }

    pub fn tf_idf(&self, term: &str, doc_id: DocId) -> f64 {
        self.tf(term, doc_id) * self.idf(term)
    }
}

/// Tokenize a query and drop repeated terms, keeping first occurrences.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn dampened_tf(freq: u32) -> f64 {
    if freq == 0 { 0.0 } else { 1.0 + (freq as f64).ln() }
}

fn inverse_df(df: usize, total_docs: usize) -> f64 {
    if df == 0 || total_docs == 0 {
        return 0.0;
    }
    (total_docs as f64 / df as f64).ln()
}

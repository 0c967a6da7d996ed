use crate::DocId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub path: String,
    pub content: String,
}

/// Append-only collection of documents.
///
/// Ids are handed out sequentially from zero, so the k-th document added
/// since the last [`clear`](DocumentStore::clear) has id `k - 1` and sits at
/// position `k - 1` of the backing vector.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    next_id: DocId,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Take ownership of `content` and return the id assigned to it.
    pub fn add_document(&mut self, path: impl Into<String>, content: String) -> DocId {
        let id = self.next_id;
        self.next_id += 1;
        self.documents.push(Document { id, path: path.into(), content });
        id
    }

    pub fn get_document(&self, doc_id: DocId) -> Option<&Document> {
        // Fast path is positional; the id check keeps lookups exact.
        self.documents
            .get(doc_id as usize)
            .filter(|doc| doc.id == doc_id)
            .or_else(|| self.documents.iter().find(|doc| doc.id == doc_id))
    }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn size(&self) -> usize { self.documents.len() }

    pub fn empty(&self) -> bool { self.documents.is_empty() }

    pub fn clear(&mut self) {
        self.documents.clear();
        self.next_id = 0;
    }
}

//! In-memory full-text search over a corpus of local text files.
//!
//! The engine is split into four pieces that are composed by [`NoteIndex`]:
//! a [`tokenizer`], a [`DocumentStore`], an [`InvertedIndex`] and a
//! [`SearchEngine`] that ranks AND-matching documents by TF-IDF. The
//! [`scanner`] module is the only part that touches the filesystem.

pub mod engine;
pub mod index;
pub mod scanner;
pub mod search;
pub mod snippet;
pub mod store;
pub mod tokenizer;

pub use engine::{IndexStats, NoteIndex};
pub use index::{InvertedIndex, Posting};
pub use search::{SearchEngine, SearchResult};
pub use store::{Document, DocumentStore};

pub type DocId = u32;

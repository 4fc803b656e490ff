pub mod error;
pub mod extract;
pub mod index;
pub mod service;
pub mod store;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

pub use error::{Error, Result};
pub use index::{IndexConfig, TfIdfIndex};
pub use service::SearchService;
pub use store::DocumentStore;
pub use tokenizer::{Analyzer, AnalyzerConfig};

pub type TermId = u32;
/// 1-based position of a document in the store.
pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
}

impl Document {
    /// Human-readable label used in search results, e.g. "Document 3".
    pub fn label(id: DocId) -> String {
        format!("Document {id}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f32, // normalized tf-idf weight
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f32,
}

use crate::index::{IndexConfig, TfIdfIndex};
use crate::store::DocumentStore;
use crate::{DocId, Document, Result, ScoredDoc};
use parking_lot::RwLock;

struct Corpus {
    store: DocumentStore,
    index: TfIdfIndex,
}

/// Document store and tf-idf index behind one lock, so readers never see a matrix
/// built from a different number of documents than the store holds.
pub struct SearchService {
    inner: RwLock<Corpus>,
}

impl SearchService {
    pub fn new(config: IndexConfig) -> Self {
        Self { inner: RwLock::new(Corpus { store: DocumentStore::new(), index: TfIdfIndex::new(config) }) }
    }

    /// Append a document and rebuild the index in one write-locked step.
    pub fn add_document(&self, text: impl Into<String>) -> Result<DocId> {
        let mut corpus = self.inner.write();
        let Corpus { store, index } = &mut *corpus;
        let id = store.add_document(text);
        index.rebuild(store.texts())?;
        Ok(id)
    }

    pub fn size(&self) -> usize { self.inner.read().store.size() }

    pub fn score(&self, query: &str) -> Result<Vec<ScoredDoc>> {
        self.inner.read().index.score(query)
    }

    pub fn document(&self, id: DocId) -> Option<Document> {
        self.inner.read().store.get(id)
    }

    pub fn vocabulary_size(&self) -> usize { self.inner.read().index.vocabulary_size() }
}

impl Default for SearchService {
    fn default() -> Self { Self::new(IndexConfig::default()) }
}

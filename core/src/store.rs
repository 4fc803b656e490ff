use crate::{DocId, Document};

/// Append-only sequence of raw document texts. A document's id is its 1-based position.
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    texts: Vec<String>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn add_document(&mut self, text: impl Into<String>) -> DocId {
        self.texts.push(text.into());
        self.texts.len() as DocId
    }

    pub fn size(&self) -> usize { self.texts.len() }

    pub fn is_empty(&self) -> bool { self.texts.is_empty() }

    pub fn get(&self, id: DocId) -> Option<Document> {
        let idx = (id as usize).checked_sub(1)?;
        self.texts.get(idx).map(|text| Document { id, text: text.clone() })
    }

    /// All texts in store order, as consumed by the index rebuild.
    pub fn texts(&self) -> &[String] { &self.texts }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus is empty, add a document first")]
    EmptyCorpus,
    #[error("index has not been built yet")]
    IndexNotReady,
    #[error("text extraction failed: {0}")]
    Extraction(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Both empty-state kinds surface to clients the same way.
    pub fn is_empty_state(&self) -> bool {
        matches!(self, Error::EmptyCorpus | Error::IndexNotReady)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

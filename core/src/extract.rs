use crate::{Error, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Pdf,
    PlainText,
}

impl ArtifactKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => ArtifactKind::Pdf,
            _ => ArtifactKind::PlainText,
        }
    }
}

/// Turns a stored artifact into a single string of text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], kind: ArtifactKind) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl TextExtractor for DefaultExtractor {
    fn extract(&self, bytes: &[u8], kind: ArtifactKind) -> Result<String> {
        match kind {
            ArtifactKind::Pdf => extract_pdf(bytes),
            ArtifactKind::PlainText => Ok(decode_lossy(bytes)),
        }
    }
}

// pdf-extract panics on some malformed files, so those are reported like any other failure.
fn extract_pdf(bytes: &[u8]) -> Result<String> {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(Error::Extraction(e.to_string())),
        Err(_) => Err(Error::Extraction("pdf parser panicked".into())),
    }
}

/// UTF-8 decode that drops invalid byte sequences instead of substituting them.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

pub fn extract_file(extractor: &dyn TextExtractor, path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    extractor.extract(&bytes, ArtifactKind::from_path(path))
}

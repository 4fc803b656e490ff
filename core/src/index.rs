use crate::tokenizer::{Analyzer, AnalyzerConfig};
use crate::{DocId, Error, Posting, Result, ScoredDoc, TermId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    pub analyzer: AnalyzerConfig,
    /// Use `1 + ln(tf)` instead of the raw term count.
    pub sublinear_tf: bool,
}

/// Sparse N x V tf-idf matrix, stored column-wise as postings lists.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfMatrix {
    dictionary: HashMap<String, TermId>,
    idf: Vec<f32>,
    postings: Vec<Vec<Posting>>, // indexed by term id, sorted by doc_id
    num_docs: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TfIdfIndex {
    analyzer: Analyzer,
    sublinear_tf: bool,
    matrix: Option<TfIdfMatrix>,
}

impl TfIdfIndex {
    pub fn new(config: IndexConfig) -> Self {
        Self { analyzer: Analyzer::new(config.analyzer), sublinear_tf: config.sublinear_tf, matrix: None }
    }

    pub fn is_ready(&self) -> bool { self.matrix.is_some() }

    pub fn matrix(&self) -> Option<&TfIdfMatrix> { self.matrix.as_ref() }

    pub fn num_docs(&self) -> usize {
        self.matrix.as_ref().map_or(0, |m| m.num_docs as usize)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.matrix.as_ref().map_or(0, |m| m.dictionary.len())
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.matrix.as_ref()?.dictionary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        let m = self.matrix.as_ref()?;
        m.dictionary.get(term).map(|&tid| m.idf[tid as usize])
    }

    /// Replace the matrix with one computed from `documents`, given in store order.
    pub fn rebuild(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            self.matrix = None;
            return Err(Error::EmptyCorpus);
        }
        let num_docs = documents.len() as u32;

        // Raw counts per document, ordered by term so float sums are reproducible
        let mut doc_counts: Vec<BTreeMap<String, u32>> = Vec::with_capacity(documents.len());
        let mut df_by_term: BTreeMap<String, u32> = BTreeMap::new();
        for text in documents {
            let mut tf_counts: BTreeMap<String, u32> = BTreeMap::new();
            for (term, _pos) in self.analyzer.analyze(text) {
                *tf_counts.entry(term).or_insert(0) += 1;
            }
            for term in tf_counts.keys() {
                *df_by_term.entry(term.clone()).or_insert(0) += 1;
            }
            doc_counts.push(tf_counts);
        }

        // Columns in lexicographic order
        let mut dictionary: HashMap<String, TermId> = HashMap::with_capacity(df_by_term.len());
        let mut idf: Vec<f32> = Vec::with_capacity(df_by_term.len());
        for (tid, (term, df_t)) in df_by_term.into_iter().enumerate() {
            idf.push(smoothed_idf(num_docs, df_t));
            dictionary.insert(term, tid as TermId);
        }

        // First pass: tf-idf weights and row norms
        let mut postings: Vec<Vec<Posting>> = vec![Vec::new(); idf.len()];
        let mut doc_norms: Vec<f32> = vec![0.0; documents.len()];
        for (row, tf_counts) in doc_counts.into_iter().enumerate() {
            let doc_id = row as DocId + 1;
            for (term, tf_raw) in tf_counts {
                let tid = dictionary[&term];
                let tfidf = self.tf(tf_raw) * idf[tid as usize];
                doc_norms[row] += tfidf * tfidf;
                postings[tid as usize].push(Posting { doc_id, weight: tfidf });
            }
        }
        for dn in doc_norms.iter_mut() {
            *dn = dn.sqrt();
            if *dn == 0.0 { *dn = 1.0; }
        }

        // Second pass: normalize rows
        for plist in postings.iter_mut() {
            for p in plist.iter_mut() {
                p.weight /= doc_norms[(p.doc_id - 1) as usize];
            }
            plist.sort_by_key(|p| p.doc_id);
        }

        tracing::debug!(num_docs, num_terms = dictionary.len(), "rebuilt tf-idf matrix");
        self.matrix = Some(TfIdfMatrix { dictionary, idf, postings, num_docs });
        Ok(())
    }

    /// Rank every document by cosine similarity to `query`, best first, ties by ascending id.
    pub fn score(&self, query: &str) -> Result<Vec<ScoredDoc>> {
        let m = self.matrix.as_ref().ok_or(Error::IndexNotReady)?;

        let mut tf_q_raw: BTreeMap<TermId, u32> = BTreeMap::new();
        for (term, _pos) in self.analyzer.analyze(query) {
            if let Some(&tid) = m.dictionary.get(&term) {
                *tf_q_raw.entry(tid).or_insert(0) += 1;
            }
        }

        let mut q_weights: Vec<(TermId, f32)> = tf_q_raw
            .into_iter()
            .map(|(tid, tf_raw)| (tid, self.tf(tf_raw) * m.idf[tid as usize]))
            .collect();
        let norm = q_weights.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in q_weights.iter_mut() { *w /= norm; }
        }

        let mut scores: Vec<f32> = vec![0.0; m.num_docs as usize];
        for (tid, q_w) in q_weights {
            for p in &m.postings[tid as usize] {
                scores[(p.doc_id - 1) as usize] += p.weight * q_w; // cosine since both sides are normalized
            }
        }

        let mut ranked: Vec<ScoredDoc> = scores
            .into_iter()
            .enumerate()
            .map(|(row, score)| ScoredDoc { doc_id: row as DocId + 1, score })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
        Ok(ranked)
    }

    /// L2 norm of each document row, in store order.
    pub fn row_norms(&self) -> Vec<f32> {
        let Some(m) = self.matrix.as_ref() else { return Vec::new() };
        let mut sq = vec![0.0f32; m.num_docs as usize];
        for p in m.postings.iter().flatten() {
            sq[(p.doc_id - 1) as usize] += p.weight * p.weight;
        }
        sq.into_iter().map(f32::sqrt).collect()
    }

    fn tf(&self, tf_raw: u32) -> f32 {
        if self.sublinear_tf {
            if tf_raw > 0 { 1.0 + (tf_raw as f32).ln() } else { 0.0 }
        } else {
            tf_raw as f32
        }
    }
}

/// `ln((1 + n) / (1 + df)) + 1`, positive for every term.
fn smoothed_idf(num_docs: u32, df: u32) -> f32 {
    ((1.0 + num_docs as f32) / (1.0 + df as f32)).ln() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let mut idx = TfIdfIndex::default();
        assert!(matches!(idx.rebuild(&[]), Err(Error::EmptyCorpus)));
        assert!(!idx.is_ready());
    }

    #[test]
    fn empty_rebuild_discards_previous_matrix() {
        let mut idx = TfIdfIndex::default();
        idx.rebuild(&docs(&["cat sat"])).unwrap();
        assert!(idx.is_ready());

        assert!(matches!(idx.rebuild(&[]), Err(Error::EmptyCorpus)));
        assert!(!idx.is_ready());
        assert_eq!(idx.num_docs(), 0);
        assert!(matches!(idx.score("cat"), Err(Error::IndexNotReady)));
    }

    #[test]
    fn score_before_rebuild_is_not_ready() {
        let idx = TfIdfIndex::default();
        assert!(matches!(idx.score("anything"), Err(Error::IndexNotReady)));
    }

    #[test]
    fn idf_follows_smoothed_formula() {
        let mut idx = TfIdfIndex::default();
        idx.rebuild(&docs(&["apple banana", "apple cherry"])).unwrap();
        let expected_shared = (3.0f32 / 3.0).ln() + 1.0;
        let expected_rare = (3.0f32 / 2.0).ln() + 1.0;
        assert!((idx.idf("apple").unwrap() - expected_shared).abs() < 1e-6);
        assert!((idx.idf("banana").unwrap() - expected_rare).abs() < 1e-6);
        assert!(idx.idf("durian").is_none());
    }

    #[test]
    fn vocabulary_is_lexicographic() {
        let mut idx = TfIdfIndex::default();
        idx.rebuild(&docs(&["zebra yak", "aardvark"])).unwrap();
        assert_eq!(idx.vocabulary_size(), 3);
        assert_eq!(idx.term_id("aardvark"), Some(0));
        assert_eq!(idx.term_id("yak"), Some(1));
        assert_eq!(idx.term_id("zebra"), Some(2));
    }

    #[test]
    fn rows_are_unit_length_unless_empty() {
        let mut idx = TfIdfIndex::default();
        idx.rebuild(&docs(&["red red green", "", "the of and", "blue green"])).unwrap();
        let norms = idx.row_norms();
        assert_eq!(norms.len(), 4);
        assert!((norms[0] - 1.0).abs() < 1e-5);
        assert_eq!(norms[1], 0.0);
        assert_eq!(norms[2], 0.0);
        assert!((norms[3] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sublinear_tf_dampens_repetition() {
        let corpus = docs(&["spam spam spam spam eggs", "eggs ham"]);
        let mut raw = TfIdfIndex::default();
        raw.rebuild(&corpus).unwrap();
        let mut damped = TfIdfIndex::new(IndexConfig { sublinear_tf: true, ..Default::default() });
        damped.rebuild(&corpus).unwrap();

        let raw_eggs = raw.score("eggs").unwrap().into_iter().find(|s| s.doc_id == 1).unwrap().score;
        let damped_eggs = damped.score("eggs").unwrap().into_iter().find(|s| s.doc_id == 1).unwrap().score;
        assert!(damped_eggs > raw_eggs);
    }

    #[test]
    fn repeated_query_terms_do_not_change_single_term_ranking() {
        let mut idx = TfIdfIndex::default();
        idx.rebuild(&docs(&["rust systems", "rust rust programming", "python"])).unwrap();
        let once = idx.score("rust").unwrap();
        let twice = idx.score("rust rust").unwrap();
        for (a, b) in once.iter().zip(&twice) {
            assert_eq!(a.doc_id, b.doc_id);
            assert!((a.score - b.score).abs() < 1e-6);
        }
    }
}

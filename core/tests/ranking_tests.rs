use docsearch_core::{AnalyzerConfig, Error, IndexConfig, SearchService, TfIdfIndex};

fn corpus(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn scoring_is_deterministic() {
    let svc = SearchService::default();
    for text in ["rust ownership borrowing", "garbage collection java", "rust async tokio"] {
        svc.add_document(text).unwrap();
    }
    let first = svc.score("rust tokio").unwrap();
    for _ in 0..5 {
        assert_eq!(svc.score("rust tokio").unwrap(), first);
    }
}

#[test]
fn rebuild_is_idempotent() {
    let docs = corpus(&["alpha beta", "beta gamma gamma", ""]);
    let mut idx = TfIdfIndex::default();
    idx.rebuild(&docs).unwrap();
    let first = idx.matrix().cloned().unwrap();
    idx.rebuild(&docs).unwrap();
    assert_eq!(idx.matrix().unwrap(), &first);
}

#[test]
fn self_similarity_ranks_document_first() {
    let svc = SearchService::default();
    svc.add_document("volcanic basalt eruption magma").unwrap();
    svc.add_document("orbital satellite telemetry").unwrap();
    svc.add_document("sourdough starter fermentation").unwrap();

    let ranked = svc.score("orbital satellite telemetry").unwrap();
    assert_eq!(ranked[0].doc_id, 2);
    assert!((ranked[0].score - 1.0).abs() < 1e-5);
    assert!(ranked[1..].iter().all(|s| s.score == 0.0));
}

#[test]
fn corpus_grows_by_one_per_document() {
    let svc = SearchService::default();
    for n in 1..=5 {
        let id = svc.add_document(format!("doc number {n}")).unwrap();
        assert_eq!(id as usize, n);
        assert_eq!(svc.size(), n);
        assert_eq!(svc.score("doc").unwrap().len(), n);
    }
}

#[test]
fn empty_service_refuses_to_score() {
    let svc = SearchService::default();
    let err = svc.score("cat").unwrap_err();
    assert!(matches!(err, Error::IndexNotReady));
    assert!(err.is_empty_state());
}

#[test]
fn unknown_terms_score_zero_for_every_document() {
    let svc = SearchService::default();
    svc.add_document("the cat sat").unwrap();
    svc.add_document("the dog ran").unwrap();
    let ranked = svc.score("xylophone").unwrap();
    assert_eq!(ranked.len(), 2);
    assert!(ranked.iter().all(|s| s.score == 0.0));
    assert_eq!(ranked.iter().map(|s| s.doc_id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn empty_document_is_accepted() {
    let svc = SearchService::default();
    assert_eq!(svc.add_document("").unwrap(), 1);
    let ranked = svc.score("anything").unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].score, 0.0);
}

#[test]
fn cat_query_without_stemming() {
    let svc = SearchService::default();
    for text in ["the cat sat", "the dog ran", "cats and dogs"] {
        svc.add_document(text).unwrap();
    }
    let ranked = svc.score("cat").unwrap();
    // "cats" is a distinct term, so only document 1 matches; zero-score ties keep id order
    assert_eq!(ranked.iter().map(|s| s.doc_id).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(ranked[0].score > 0.0);
    assert_eq!(ranked[1].score, 0.0);
    assert_eq!(ranked[2].score, 0.0);
}

#[test]
fn cat_query_with_stemming() {
    let config = IndexConfig { analyzer: AnalyzerConfig { stem: true, remove_stopwords: true }, sublinear_tf: false };
    let svc = SearchService::new(config);
    for text in ["the cat sat", "the dog ran", "cats and dogs"] {
        svc.add_document(text).unwrap();
    }
    let ranked = svc.score("cat").unwrap();
    // document 3 is {cat, dog} where both terms share one idf; document 1 also carries the rarer "sat"
    assert_eq!(ranked.iter().map(|s| s.doc_id).collect::<Vec<_>>(), vec![3, 1, 2]);
    assert!(ranked[1].score > 0.0);
    assert_eq!(ranked[2].score, 0.0);
}

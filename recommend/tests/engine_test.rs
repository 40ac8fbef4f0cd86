//! Integration tests for the recommendation engine.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use newsrec_embeddings::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, Result as EmbeddingResult,
};
use newsrec_recommend::{RecommendError, Recommender};

/// Provider serving fixed vectors keyed by text, counting calls.
struct StubProvider {
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl StubProvider {
    fn new(vectors: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: vectors
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.clone()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    fn default_dimension(&self) -> usize {
        3
    }

    async fn embed(&self, request: EmbeddingRequest) -> EmbeddingResult<EmbeddingResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let embedding = self
            .vectors
            .get(&request.text)
            .cloned()
            .unwrap_or_else(|| vec![1.0, 0.0, 0.0]);
        let dimension = embedding.len();

        Ok(EmbeddingResponse {
            embedding,
            model: request.model.unwrap_or_else(|| "stub-model".to_string()),
            dimension,
            tokens_used: None,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|t| t.to_string()).collect()
}

#[tokio::test]
async fn test_end_to_end_recommendation() {
    // Items 0 and 1 are near-identical vectors, item 2 is orthogonal.
    let provider = Arc::new(StubProvider::new(&[
        ("cat dog", vec![1.0, 0.05, 0.0]),
        ("dog cat", vec![0.99, 0.08, 0.0]),
        ("ocean wave", vec![0.0, 0.0, 1.0]),
    ]));

    let mut engine = Recommender::builder()
        .without_cache_persistence()
        .build(provider.clone())
        .await
        .unwrap();

    engine
        .index_corpus(texts(&["cat dog", "dog cat", "ocean wave"]))
        .await
        .unwrap();

    let similar = engine.recommend(0, 1).unwrap();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].index, 1);
    assert_eq!(similar[0].text, "dog cat");
    assert!(similar[0].score > 0.9);
}

#[tokio::test]
async fn test_rank_includes_query_first() {
    let provider = Arc::new(StubProvider::new(&[
        ("a", vec![1.0, 0.0, 0.0]),
        ("b", vec![0.0, 1.0, 0.0]),
    ]));

    let mut engine = Recommender::builder()
        .without_cache_persistence()
        .build(provider)
        .await
        .unwrap();
    engine.index_corpus(texts(&["a", "b"])).await.unwrap();

    let ranked = engine.rank(0).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].index, 0);
    assert!((ranked[0].score - 1.0).abs() < 1e-6);
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn test_duplicate_texts_excluded() {
    let provider = Arc::new(StubProvider::new(&[
        ("A", vec![1.0, 0.0, 0.0]),
        ("B", vec![0.0, 1.0, 0.0]),
    ]));

    let mut engine = Recommender::builder()
        .without_cache_persistence()
        .build(provider.clone())
        .await
        .unwrap();
    engine.index_corpus(texts(&["A", "A", "B"])).await.unwrap();

    // Both copies of "A" resolve through one cache entry.
    assert_eq!(provider.call_count(), 2);

    let similar = engine.recommend(0, 1).unwrap();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].index, 2);
    assert_eq!(similar[0].text, "B");
}

#[tokio::test]
async fn test_truncates_to_available_candidates() {
    let provider = Arc::new(StubProvider::new(&[
        ("first", vec![1.0, 0.0, 0.0]),
        ("second", vec![0.5, 0.5, 0.0]),
    ]));

    let mut engine = Recommender::builder()
        .without_cache_persistence()
        .build(provider)
        .await
        .unwrap();
    engine
        .index_corpus(texts(&["first", "second"]))
        .await
        .unwrap();

    let similar = engine.recommend(0, 5).unwrap();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].index, 1);
}

#[tokio::test]
async fn test_configured_default_top_k() {
    let provider = Arc::new(StubProvider::new(&[
        ("a", vec![1.0, 0.0, 0.0]),
        ("b", vec![0.9, 0.1, 0.0]),
        ("c", vec![0.8, 0.2, 0.0]),
        ("d", vec![0.0, 1.0, 0.0]),
    ]));

    let mut engine = Recommender::builder()
        .without_cache_persistence()
        .with_top_k(2)
        .build(provider)
        .await
        .unwrap();
    engine
        .index_corpus(texts(&["a", "b", "c", "d"]))
        .await
        .unwrap();

    let similar = engine.recommendations(0).unwrap();
    assert_eq!(similar.len(), 2);
    assert_eq!(similar[0].index, 1);
    assert_eq!(similar[1].index, 2);
}

#[tokio::test]
async fn test_cache_reused_across_engines() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("embeddings.json");
    let provider = Arc::new(StubProvider::new(&[
        ("cat dog", vec![1.0, 0.05, 0.0]),
        ("dog cat", vec![0.99, 0.08, 0.0]),
        ("ocean wave", vec![0.0, 0.0, 1.0]),
    ]));
    let corpus = texts(&["cat dog", "dog cat", "ocean wave"]);

    {
        let mut engine = Recommender::builder()
            .with_cache_path(&cache_path)
            .build(provider.clone())
            .await
            .unwrap();
        engine.index_corpus(corpus.clone()).await.unwrap();
    }
    assert_eq!(provider.call_count(), 3);

    let mut engine = Recommender::builder()
        .with_cache_path(&cache_path)
        .build(provider.clone())
        .await
        .unwrap();
    engine.index_corpus(corpus).await.unwrap();

    // Every embedding came from the durable store.
    assert_eq!(provider.call_count(), 3);

    let similar = engine.recommend(0, 1).unwrap();
    assert_eq!(similar[0].index, 1);
}

#[tokio::test]
async fn test_rank_before_indexing_fails() {
    let provider = Arc::new(StubProvider::new(&[]));
    let engine = Recommender::builder()
        .without_cache_persistence()
        .build(provider)
        .await
        .unwrap();

    assert!(matches!(
        engine.rank(0),
        Err(RecommendError::CorpusNotIndexed)
    ));
}

#[tokio::test]
async fn test_stats() {
    let provider = Arc::new(StubProvider::new(&[
        ("a", vec![1.0, 0.0, 0.0]),
        ("b", vec![0.0, 1.0, 0.0]),
    ]));

    let mut engine = Recommender::builder()
        .without_cache_persistence()
        .build(provider)
        .await
        .unwrap();
    engine.index_corpus(texts(&["a", "b"])).await.unwrap();

    let stats = engine.stats().await;
    assert_eq!(stats.corpus_size, 2);
    assert_eq!(stats.cached_embeddings, 2);
    assert_eq!(stats.models, vec!["text-embedding-3-small".to_string()]);
}

//! Recommendation engine implementation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use newsrec_embeddings::{
    Embedding, EmbeddingCache, EmbeddingProvider, RankedItem, rank, top_k_recommendations,
};

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};

/// A recommended corpus item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Index of the item in the corpus.
    pub index: usize,

    /// The recommended text.
    pub text: String,

    /// Cosine similarity to the query item.
    pub score: f32,
}

/// Engine producing similar-item recommendations over a text corpus.
///
/// Coordinates the embedding provider, the persistent embedding cache,
/// and brute-force cosine-similarity ranking. The corpus is ordered:
/// insertion order is index identity, and duplicate texts are allowed.
pub struct Recommender {
    /// Configuration.
    config: RecommenderConfig,

    /// External embedding generation.
    provider: Arc<dyn EmbeddingProvider>,

    /// Persistent embedding cache.
    cache: EmbeddingCache,

    /// Indexed corpus texts.
    corpus: Vec<String>,

    /// Embeddings parallel to `corpus`.
    embeddings: Vec<Embedding>,
}

impl Recommender {
    /// Create a new recommendation engine builder.
    pub fn builder() -> RecommenderBuilder {
        RecommenderBuilder::new()
    }

    /// Initialize the engine with the given configuration.
    pub async fn new(
        provider: Arc<dyn EmbeddingProvider>,
        config: RecommenderConfig,
    ) -> Result<Self> {
        info!("initializing recommendation engine (model: {})", config.model);

        let cache = match &config.cache_path {
            Some(path) => EmbeddingCache::with_persistence(path).await?,
            None => EmbeddingCache::new(),
        };

        Ok(Self {
            config,
            provider,
            cache,
            corpus: Vec::new(),
            embeddings: Vec::new(),
        })
    }

    /// Embed and index a corpus of texts, replacing any previous corpus.
    ///
    /// Texts are embedded one at a time through the cache, so texts seen
    /// before (in this run or an earlier run sharing the durable store)
    /// cost no provider call.
    pub async fn index_corpus(&mut self, texts: Vec<String>) -> Result<()> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in &texts {
            let embedding = self
                .cache
                .get_or_compute(self.provider.as_ref(), text, &self.config.model)
                .await?;
            embeddings.push(embedding);
        }

        info!("indexed corpus of {} texts", texts.len());
        self.corpus = texts;
        self.embeddings = embeddings;
        Ok(())
    }

    /// The indexed corpus.
    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    /// Full similarity ranking for the item at `query_index`.
    ///
    /// The ranking covers every corpus index, the query itself included
    /// and ranked first, sorted by descending score.
    pub fn rank(&self, query_index: usize) -> Result<Vec<RankedItem>> {
        if self.embeddings.is_empty() {
            return Err(RecommendError::CorpusNotIndexed);
        }

        debug!("ranking corpus against index {query_index}");
        Ok(rank(&self.embeddings, query_index)?)
    }

    /// The top `k` items most similar to the one at `query_index`.
    ///
    /// Items whose text is exactly equal to the query's text are excluded,
    /// the query itself among them. Returns fewer than `k` items when the
    /// corpus has fewer qualifying entries.
    pub fn recommend(&self, query_index: usize, k: usize) -> Result<Vec<Recommendation>> {
        let ranked = self.rank(query_index)?;
        let indices = top_k_recommendations(&ranked, &self.corpus, query_index, k)?;

        let scores: HashMap<usize, f32> = ranked
            .iter()
            .map(|item| (item.index, item.score))
            .collect();

        Ok(indices
            .into_iter()
            .map(|index| Recommendation {
                index,
                text: self.corpus[index].clone(),
                score: scores.get(&index).copied().unwrap_or_default(),
            })
            .collect())
    }

    /// Top recommendations using the configured default count.
    pub fn recommendations(&self, query_index: usize) -> Result<Vec<Recommendation>> {
        self.recommend(query_index, self.config.top_k)
    }

    /// Get engine statistics.
    pub async fn stats(&self) -> EngineStats {
        let cache_stats = self.cache.stats().await;
        EngineStats {
            corpus_size: self.corpus.len(),
            cached_embeddings: cache_stats.entries,
            models: cache_stats.models,
        }
    }
}

/// Builder for the recommendation engine.
pub struct RecommenderBuilder {
    config: RecommenderConfig,
}

impl RecommenderBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: RecommenderConfig::default(),
        }
    }

    /// Set the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the durable cache path.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cache_path = Some(path.into());
        self
    }

    /// Keep the embedding cache in memory only.
    pub fn without_cache_persistence(mut self) -> Self {
        self.config.cache_path = None;
        self
    }

    /// Set the default recommendation count.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Build the engine.
    pub async fn build(self, provider: Arc<dyn EmbeddingProvider>) -> Result<Recommender> {
        Recommender::new(provider, self.config).await
    }
}

impl Default for RecommenderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the recommendation engine.
#[derive(Debug, Clone)]
pub struct EngineStats {
    /// Number of indexed corpus texts.
    pub corpus_size: usize,

    /// Number of embeddings in the cache.
    pub cached_embeddings: usize,

    /// Models with cached embeddings.
    pub models: Vec<String>,
}

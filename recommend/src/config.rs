//! Configuration for the recommendation engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the recommendation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Model identifier used for embedding generation.
    pub model: String,

    /// Path of the durable embedding cache.
    ///
    /// `None` keeps the cache in memory only.
    pub cache_path: Option<PathBuf>,

    /// Default number of recommendations to return.
    pub top_k: usize,
}

impl RecommenderConfig {
    /// Create a new configuration for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the durable cache path.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Keep the embedding cache in memory only.
    pub fn without_cache_persistence(mut self) -> Self {
        self.cache_path = None;
        self
    }

    /// Set the default recommendation count.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            cache_path: dirs::data_dir().map(|dir| dir.join("newsrec/embedding-cache.json")),
            top_k: 5,
        }
    }
}

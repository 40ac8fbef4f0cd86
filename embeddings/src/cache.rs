//! Persistent embedding cache.
//!
//! Maps (text, model) pairs to embedding vectors so that each distinct
//! pair is sent to the external provider at most once across runs.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest};

/// Key identifying one embedding computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// The raw text that was embedded.
    pub text: String,

    /// Model used to generate the embedding.
    pub model: String,
}

impl CacheKey {
    /// Create a new cache key.
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
        }
    }
}

/// Durable-store record for one cached embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The text that was embedded.
    pub text: String,

    /// Model used to generate the embedding.
    pub model: String,

    /// The embedding vector.
    pub embedding: Embedding,
}

/// Cache for embeddings to avoid redundant provider calls.
///
/// Entries are never evicted or recomputed: once a (text, model) pair is
/// stored, every later lookup returns the stored vector. Embedding models
/// are expected to be stable per model identifier; changing a model's
/// output without changing its identifier would leave stale vectors here.
pub struct EmbeddingCache {
    /// In-memory cache.
    cache: Arc<RwLock<HashMap<CacheKey, Embedding>>>,

    /// Path for persistent cache storage.
    cache_path: Option<PathBuf>,
}

impl EmbeddingCache {
    /// Create a new in-memory cache.
    pub fn new() -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_path: None,
        }
    }

    /// Create a cache backed by a durable store.
    ///
    /// An absent store file starts the cache empty; so does a file that
    /// exists but cannot be parsed. An I/O-level read failure is an error.
    pub async fn with_persistence(path: impl AsRef<Path>) -> Result<Self> {
        let cache = Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_path: Some(path.as_ref().to_path_buf()),
        };

        cache.load().await?;
        Ok(cache)
    }

    /// Get an embedding from the cache.
    pub async fn get(&self, text: &str, model: &str) -> Option<Embedding> {
        let key = CacheKey::new(text, model);
        let cache = self.cache.read().await;
        cache.get(&key).cloned()
    }

    /// Put an embedding in the cache and persist the updated state.
    pub async fn put(&self, text: &str, model: &str, embedding: Embedding) -> Result<()> {
        let key = CacheKey::new(text, model);

        let mut cache = self.cache.write().await;
        cache.insert(key, embedding);
        debug!("cached embedding for text (model: {model})");
        drop(cache); // Release lock before I/O

        self.save().await
    }

    /// Return the cached embedding for (text, model), computing it through
    /// `provider` on a miss.
    ///
    /// A hit returns the stored vector with no external call. A miss
    /// invokes the provider exactly once for this key, stores the result,
    /// persists the cache, and returns the vector. If persistence fails
    /// the in-memory entry is kept and the error is surfaced; only the
    /// durable copy is stale.
    pub async fn get_or_compute(
        &self,
        provider: &dyn EmbeddingProvider,
        text: &str,
        model: &str,
    ) -> Result<Embedding> {
        if let Some(embedding) = self.get(text, model).await {
            debug!("cache hit for embedding (model: {model})");
            return Ok(embedding);
        }

        debug!("cache miss, requesting embedding (model: {model})");
        let request = EmbeddingRequest::new(text).with_model(model);
        let response = provider.embed(request).await?;

        if response.embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse(
                "provider returned an empty embedding".to_string(),
            ));
        }

        self.put(text, model, response.embedding.clone()).await?;
        Ok(response.embedding)
    }

    /// Check if an embedding is cached.
    pub async fn contains(&self, text: &str, model: &str) -> bool {
        let key = CacheKey::new(text, model);
        self.cache.read().await.contains_key(&key)
    }

    /// Get the number of cached embeddings.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        CacheStats {
            entries: cache.len(),
            models: cache
                .keys()
                .map(|k| k.model.clone())
                .collect::<HashSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    /// Save the cache to the durable store.
    ///
    /// The whole store is rewritten in place on every insertion. The write
    /// is not crash-atomic: a crash mid-write can corrupt the store file,
    /// which a later load treats as empty. Batching writes or an
    /// atomic rename-on-write would close that window at the cost of a
    /// behavior change.
    async fn save(&self) -> Result<()> {
        let Some(ref path) = self.cache_path else {
            return Ok(());
        };

        let cache = self.cache.read().await;
        let entries: Vec<CacheEntry> = cache
            .iter()
            .map(|(key, embedding)| CacheEntry {
                text: key.text.clone(),
                model: key.model.clone(),
                embedding: embedding.clone(),
            })
            .collect();
        drop(cache);

        let content = serde_json::to_string(&entries)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| EmbeddingError::Persistence(format!("{}: {e}", parent.display())))?;
        }

        fs::write(path, content)
            .await
            .map_err(|e| EmbeddingError::Persistence(format!("{}: {e}", path.display())))?;
        debug!("saved {} cache entries to disk", entries.len());
        Ok(())
    }

    /// Load the cache from the durable store.
    async fn load(&self) -> Result<()> {
        let Some(ref path) = self.cache_path else {
            return Ok(());
        };

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no cache file at {}, starting empty", path.display());
                return Ok(());
            }
            Err(e) => {
                return Err(EmbeddingError::Persistence(format!(
                    "{}: {e}",
                    path.display()
                )));
            }
        };

        let entries: Vec<CacheEntry> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "ignoring unparseable cache file {}: {e}",
                    path.display()
                );
                return Ok(());
            }
        };

        let mut cache = self.cache.write().await;
        for entry in entries {
            cache.insert(CacheKey::new(entry.text, entry.model), entry.embedding);
        }

        info!("loaded {} cache entries from disk", cache.len());
        Ok(())
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the embedding cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries in cache.
    pub entries: usize,

    /// Models with cached embeddings.
    pub models: Vec<String>,
}

//! # Recommendation Engine
//!
//! This crate combines the embedding components into a similar-article
//! recommendation engine:
//!
//! - **Embedding Provider**: External text-to-vector generation
//! - **Embedding Cache**: Persistent, compute-at-most-once vector storage
//! - **Similarity Ranking**: Brute-force cosine ranking with duplicate exclusion
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Recommendation Engine                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   corpus texts ──► EmbeddingCache ──► corpus embeddings         │
//! │                         │                     │                 │
//! │                         ▼                     ▼                 │
//! │                 EmbeddingProvider      rank(query_index)        │
//! │                                               │                 │
//! │                                               ▼                 │
//! │                                     top-k recommendations       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use newsrec_embeddings::OpenAIProvider;
//! use newsrec_recommend::Recommender;
//!
//! let mut engine = Recommender::builder()
//!     .with_model("text-embedding-3-small")
//!     .with_cache_path("~/.newsrec/embedding-cache.json")
//!     .build(Arc::new(OpenAIProvider::new()))
//!     .await?;
//!
//! engine.index_corpus(articles).await?;
//! let similar = engine.recommend(0, 5)?;
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::RecommenderConfig;
pub use engine::{EngineStats, Recommendation, Recommender, RecommenderBuilder};
pub use error::{RecommendError, Result};

// Re-export from dependencies for convenience
pub use newsrec_embeddings::{EmbeddingCache, EmbeddingProvider, OpenAIProvider, RankedItem};

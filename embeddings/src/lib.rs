//! # Embeddings
//!
//! This crate provides the embedding cache and brute-force similarity
//! ranking used by the newsrec recommendation engine.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors via a provider
//! - **Persistent Caching**: Each (text, model) pair is computed at most once
//! - **Similarity Ranking**: Full cosine-similarity rankings over a corpus
//! - **Recommendation Extraction**: Top-k selection with duplicate-text exclusion
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Embeddings System                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► EmbeddingCache ──► durable store         │
//! │       │                      │                                  │
//! │       ▼                      ▼                                  │
//! │  OpenAI API            rank / top_k_recommendations            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod provider;
pub mod ranking;
pub mod similarity;

pub use cache::{CacheKey, CacheStats, EmbeddingCache};
pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use ranking::{RankedItem, rank, top_k_recommendations};
pub use similarity::cosine_similarity;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings (varies by model).
pub const DEFAULT_DIMENSION: usize = 1536; // OpenAI text-embedding-3-small

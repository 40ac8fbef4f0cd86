//! Error types for the recommendation engine.

use thiserror::Error;

/// Result type alias for recommendation operations.
pub type Result<T> = std::result::Result<T, RecommendError>;

/// Errors that can occur in the recommendation engine.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] newsrec_embeddings::EmbeddingError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// No corpus has been indexed yet.
    #[error("corpus not indexed")]
    CorpusNotIndexed,

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

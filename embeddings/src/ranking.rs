//! Brute-force similarity ranking over an ordered corpus.
//!
//! Ranking is exact: every embedding is scored against the query with
//! cosine similarity, O(n) per query plus the sort. This is the
//! ground-truth reference for any accelerated search backend.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::cosine_similarity;

/// One entry in a similarity ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    /// Index of the item in the corpus.
    pub index: usize,

    /// Cosine similarity to the query item.
    pub score: f32,
}

/// Rank every embedding by similarity to the one at `query_index`.
///
/// Produces the full descending ranking, including the query index itself
/// (self-similarity ~= 1.0, ranked first). Equal scores keep ascending
/// index order, so rankings are deterministic.
pub fn rank(embeddings: &[Embedding], query_index: usize) -> Result<Vec<RankedItem>> {
    if embeddings.is_empty() {
        return Err(EmbeddingError::EmptyCorpus);
    }
    if query_index >= embeddings.len() {
        return Err(EmbeddingError::QueryIndexOutOfBounds {
            index: query_index,
            len: embeddings.len(),
        });
    }

    let query = &embeddings[query_index];
    let mut scored: Vec<(OrderedFloat<f32>, usize)> = Vec::with_capacity(embeddings.len());

    for (index, embedding) in embeddings.iter().enumerate() {
        let score = cosine_similarity(query, embedding)?;
        scored.push((OrderedFloat(score), index));
    }

    // Stable sort, descending: ties keep ascending index order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(scored
        .into_iter()
        .map(|(score, index)| RankedItem {
            index,
            score: score.0,
        })
        .collect())
}

/// Extract the top `k` recommendations from a full ranking.
///
/// Walks the ranking in order and skips every index whose text is exactly
/// equal to the query's text. This excludes the query itself and any
/// duplicate-text corpus entries, not just the literal self-match.
/// Collection stops once `k` indices are found or the ranking is
/// exhausted; fewer than `k` qualifying entries is not an error.
pub fn top_k_recommendations(
    ranked: &[RankedItem],
    corpus: &[String],
    query_index: usize,
    k: usize,
) -> Result<Vec<usize>> {
    let query_text = corpus
        .get(query_index)
        .ok_or(EmbeddingError::QueryIndexOutOfBounds {
            index: query_index,
            len: corpus.len(),
        })?;

    let mut recommendations = Vec::with_capacity(k.min(corpus.len()));

    for item in ranked {
        if recommendations.len() == k {
            break;
        }
        match corpus.get(item.index) {
            Some(text) if text == query_text => {}
            Some(_) => recommendations.push(item.index),
            None => {
                return Err(EmbeddingError::QueryIndexOutOfBounds {
                    index: item.index,
                    len: corpus.len(),
                });
            }
        }
    }

    Ok(recommendations)
}

// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Top-K document retrieval over the vector index
//!
//! Embeds the search query and returns the best-scoring chunks above the
//! configured similarity floor. Retrieval never mutates the index, so the
//! same query against the same index always yields the same hits.

use std::sync::Arc;

use tracing::debug;

use crate::config::{DEFAULT_RETRIEVAL_K, DEFAULT_SCORE_THRESHOLD};
use crate::embeddings::Embedder;
use crate::qa::errors::RetrievalError;
use crate::vector::{SearchHit, VectorIndex};

/// Retrieves context documents for a search query
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: VectorIndex,
    k: usize,
    score_threshold: f32,
}

impl Retriever {
    /// Create a retriever with the default limit and score floor
    pub fn new(embedder: Arc<dyn Embedder>, index: VectorIndex) -> Self {
        Self {
            embedder,
            index,
            k: DEFAULT_RETRIEVAL_K,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    /// Override the maximum number of hits returned
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Override the minimum cosine similarity for a hit to qualify
    pub fn with_score_threshold(mut self, score_threshold: f32) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn score_threshold(&self) -> f32 {
        self.score_threshold
    }

    /// Number of chunks currently indexed
    pub fn document_count(&self) -> usize {
        self.index.len()
    }

    /// Embed `query` and return at most `k` hits scoring at or above the
    /// threshold, best first. An empty index yields an empty hit list
    /// without calling the embedding backend.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchHit>, RetrievalError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }

        if self.index.is_empty() {
            debug!("Index is empty, skipping retrieval for '{}'", query);
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(query).await?;
        let hits = self
            .index
            .search(embedding.data(), self.k, Some(self.score_threshold))?;

        debug!(
            "Retrieved {}/{} candidate documents for '{}' (threshold {})",
            hits.len(),
            self.index.len(),
            query,
            self.score_threshold
        );

        Ok(hits)
    }
}

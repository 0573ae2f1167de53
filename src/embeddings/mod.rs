// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Text embeddings
//!
//! The `Embedder` trait is the seam between the retrieval core and whatever
//! produces vectors; the shipped implementation talks to a local Ollama
//! server, fronted by an LRU cache. Index build and query must run through
//! the same embedder so both sides share one embedding space.

pub mod cache;
pub mod ollama;

pub use cache::{CacheStats, CachedEmbedder, DEFAULT_CACHE_CAPACITY};
pub use ollama::OllamaEmbedder;

use async_trait::async_trait;
use thiserror::Error;

/// A fixed-length embedding vector
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    data: Vec<f32>,
    dimension: usize,
}

impl Embedding {
    pub fn new(data: Vec<f32>) -> Self {
        let dimension = data.len();
        Self { data, dimension }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn magnitude(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Cosine similarity in [-1, 1]; 0.0 for mismatched dimensions or a
    /// zero-magnitude operand
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.dimension != other.dimension {
            return 0.0;
        }

        let dot_product: f32 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum();

        let magnitude_self = self.magnitude();
        let magnitude_other = other.magnitude();

        if magnitude_self == 0.0 || magnitude_other == 0.0 {
            0.0
        } else {
            dot_product / (magnitude_self * magnitude_other)
        }
    }
}

/// Errors from embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Input text rejected before any call is made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level failure reaching the embedding server
    #[error("Embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Embedding API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// The response body did not contain a usable vector
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Maps text to a fixed-dimension vector
///
/// Implementations must be deterministic for identical input within a
/// session and safe for concurrent use.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Model identifier, recorded in the index manifest
    fn model_name(&self) -> &str;
}

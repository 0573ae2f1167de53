// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! LRU cache in front of an embedder
//!
//! Keyed by SHA-256 of (model, text) so a model change never serves stale
//! vectors. Ingestion re-embeds repeated chunks for free and the chat loop
//! avoids re-embedding repeated questions.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::debug;

use super::{Embedder, Embedding, EmbeddingError};
use async_trait::async_trait;

/// Default number of cached embeddings
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Cache counters
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f32,
}

struct CacheState {
    entries: LruCache<String, Embedding>,
    hits: u64,
    misses: u64,
}

/// Embedder decorator that caches results of the wrapped embedder
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    state: Mutex<CacheState>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn with_default_capacity(inner: Arc<dyn Embedder>) -> Self {
        Self::new(inner, DEFAULT_CACHE_CAPACITY)
    }

    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let total = state.hits + state.misses;
        CacheStats {
            entries: state.entries.len(),
            hits: state.hits,
            misses: state.misses,
            hit_rate: if total == 0 {
                0.0
            } else {
                state.hits as f32 / total as f32
            },
        }
    }

    fn cache_key(&self, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.inner.model_name().as_bytes());
        hasher.update([0u8]);
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl Embedder for CachedEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let key = self.cache_key(text);

        {
            let mut state = self.state.lock().await;
            if let Some(embedding) = state.entries.get(&key).cloned() {
                state.hits += 1;
                debug!(key = %&key[..12.min(key.len())], "embedding cache hit");
                return Ok(embedding);
            }
            state.misses += 1;
        }

        // Lock released while the wrapped embedder does I/O; a racing miss
        // recomputes the same deterministic vector.
        let embedding = self.inner.embed(text).await?;

        let mut state = self.state.lock().await;
        state.entries.put(key, embedding.clone());
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

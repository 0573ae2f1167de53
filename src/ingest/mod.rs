// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Document ingestion pipeline
//!
//! load `.txt` files → chunk → embed → upsert into a fresh index → persist.
//! Chunks are embedded in bounded concurrent batches but always upserted in
//! document order, so the index insertion order matches the sorted file
//! order and re-running ingestion is reproducible. A re-run replaces the
//! stored index.

pub mod chunker;
pub mod loader;

pub use chunker::TextChunker;
pub use loader::{load_text_documents, LoadedDocument};

use std::path::Path;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::embeddings::{Embedder, EmbeddingError};
use crate::vector::{Document, IndexError, VectorIndex, VectorStore, VectorStoreError};

/// Chunks embedded concurrently per batch
pub const EMBED_BATCH_SIZE: usize = 8;

/// Errors from the ingestion pipeline
#[derive(Error, Debug)]
pub enum IngestError {
    /// The configured docs directory does not exist
    #[error("Documents directory not found: {0}")]
    DocsDirMissing(String),

    /// The docs directory exists but holds no `.txt` files
    #[error("No .txt documents found in: {0}")]
    NoDocuments(String),

    /// Chunker parameters that cannot make progress
    #[error("Invalid chunking: chunk size {chunk_size} with overlap {overlap} (need chunk size >= 1 and overlap < chunk size)")]
    InvalidChunking { chunk_size: usize, overlap: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] VectorStoreError),
}

/// Counts reported after a successful ingestion run
#[derive(Debug, Clone)]
pub struct IngestStats {
    pub files: usize,
    pub chunks: usize,
    pub dimensions: usize,
}

struct PendingChunk {
    file_name: String,
    chunk_index: usize,
    text: String,
}

/// Runs the load → chunk → embed → persist pipeline
pub struct IngestPipeline {
    embedder: Arc<dyn Embedder>,
    chunker: TextChunker,
    store: VectorStore,
}

impl IngestPipeline {
    pub fn new(embedder: Arc<dyn Embedder>, chunker: TextChunker, store: VectorStore) -> Self {
        Self {
            embedder,
            chunker,
            store,
        }
    }

    /// Ingest every `.txt` document under `docs_dir`, replacing the stored
    /// index
    pub async fn run(&self, docs_dir: &Path) -> Result<IngestStats, IngestError> {
        let documents = loader::load_text_documents(docs_dir).await?;
        info!(files = documents.len(), dir = %docs_dir.display(), "loaded documents");

        let mut pending = Vec::new();
        for document in &documents {
            for (chunk_index, text) in self.chunker.split(&document.content).into_iter().enumerate()
            {
                pending.push(PendingChunk {
                    file_name: document.file_name.clone(),
                    chunk_index,
                    text,
                });
            }
        }
        info!(chunks = pending.len(), "chunked documents");

        let progress = ProgressBar::new(pending.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut index = VectorIndex::new();
        for batch in pending.chunks(EMBED_BATCH_SIZE) {
            let embeds = batch.iter().map(|chunk| self.embedder.embed(&chunk.text));
            let embeddings = futures::future::try_join_all(embeds).await?;

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                progress.set_message(chunk.file_name.clone());
                let mut document =
                    Document::with_source(chunk.text.clone(), chunk.file_name.clone());
                document
                    .source_metadata
                    .insert("chunk".to_string(), chunk.chunk_index.to_string());
                index.upsert(
                    Uuid::new_v4().to_string(),
                    document,
                    embedding.into_data(),
                )?;
                progress.inc(1);
            }
        }
        progress.finish_with_message("done");

        let manifest = self.store.save(&index, self.embedder.model_name()).await?;
        info!(
            files = documents.len(),
            chunks = index.len(),
            dimensions = manifest.dimensions,
            "ingestion complete"
        );

        Ok(IngestStats {
            files: documents.len(),
            chunks: index.len(),
            dimensions: manifest.dimensions,
        })
    }
}

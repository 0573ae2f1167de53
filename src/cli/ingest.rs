// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::embeddings::{CachedEmbedder, Embedder, OllamaEmbedder, DEFAULT_CACHE_CAPACITY};
use crate::ingest::{IngestPipeline, TextChunker};
use crate::vector::VectorStore;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory of .txt documents to index
    #[arg(long, env = "DOCQA_DOCS_DIR")]
    pub docs_dir: Option<PathBuf>,

    /// Directory the vector index is written to
    #[arg(long, env = "DOCQA_INDEX_DIR")]
    pub index_dir: Option<PathBuf>,

    /// Characters per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared between consecutive chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,
}

/// Index a directory of text documents into the vector store
pub async fn run_ingest(args: IngestArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let mut config = AppConfig::from_env()?;
    if let Some(docs_dir) = args.docs_dir {
        config.docs_dir = docs_dir;
    }
    if let Some(index_dir) = args.index_dir {
        config.index_dir = index_dir;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(chunk_overlap) = args.chunk_overlap {
        config.chunk_overlap = chunk_overlap;
    }
    config.validate()?;
    config.log_summary();

    println!("📚 Indexing .txt documents from {}", config.docs_dir.display());
    println!(
        "   Embedding with {} via {}",
        config.embed_model, config.ollama_url
    );

    let embedder: Arc<dyn Embedder> = Arc::new(CachedEmbedder::new(
        Arc::new(OllamaEmbedder::new(
            config.ollama_url.as_str(),
            config.embed_model.as_str(),
        )),
        DEFAULT_CACHE_CAPACITY,
    ));
    let chunker = TextChunker::new(config.chunk_size, config.chunk_overlap)?;
    let store = VectorStore::new(&config.index_dir);

    let pipeline = IngestPipeline::new(embedder, chunker, store);
    let stats = pipeline.run(&config.docs_dir).await?;

    println!(
        "\n✅ Indexed {} chunk(s) from {} file(s) ({} dimensions)",
        stats.chunks, stats.files, stats.dimensions
    );
    println!("   Index written to {}", config.index_dir.display());

    Ok(())
}

// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::embeddings::OllamaEmbedder;
use crate::qa::Retriever;
use crate::vector::VectorStore;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// The query to search the index with
    pub query: String,

    /// Maximum number of hits to return
    #[arg(long)]
    pub k: Option<usize>,

    /// Minimum cosine similarity for a hit
    #[arg(long)]
    pub score_threshold: Option<f32>,

    /// Directory the vector index is read from
    #[arg(long, env = "DOCQA_INDEX_DIR")]
    pub index_dir: Option<PathBuf>,
}

/// Search the index and print the matching chunks without generating an answer
pub async fn run_search(args: SearchArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let mut config = AppConfig::from_env()?;
    if let Some(k) = args.k {
        config.retrieval_k = k;
    }
    if let Some(score_threshold) = args.score_threshold {
        config.score_threshold = score_threshold;
    }
    if let Some(index_dir) = args.index_dir {
        config.index_dir = index_dir;
    }
    config.validate()?;

    let store = VectorStore::new(&config.index_dir);
    if !store.exists().await {
        return Err(anyhow!(
            "No index found at {}. Run the ingest command first",
            config.index_dir.display()
        ));
    }
    let index = store.load_for_model(&config.embed_model).await?;

    println!(
        "🔍 Searching {} chunk(s) for: {}",
        index.len(),
        args.query
    );

    let embedder = Arc::new(OllamaEmbedder::new(
        config.ollama_url.as_str(),
        config.embed_model.as_str(),
    ));
    let retriever = Retriever::new(embedder, index)
        .with_k(config.retrieval_k)
        .with_score_threshold(config.score_threshold);

    let hits = retriever.retrieve(&args.query).await?;

    if hits.is_empty() {
        println!(
            "No chunks scored at or above {:.2}",
            config.score_threshold
        );
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "\n{}. score {:.3}  {}",
            rank + 1,
            hit.score,
            hit.document.source().unwrap_or("(unknown source)")
        );
        println!("   {}", hit.document.content);
    }

    Ok(())
}

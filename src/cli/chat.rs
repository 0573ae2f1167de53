// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};

use crate::completion::{Completer, OpenRouterCompleter};
use crate::config::AppConfig;
use crate::embeddings::{CachedEmbedder, Embedder, OllamaEmbedder, DEFAULT_CACHE_CAPACITY};
use crate::qa::{ConversationSession, QueryRewriter, Retriever, RewritePolicy};
use crate::vector::{VectorIndex, VectorStore};

/// Arguments for the chat command
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Chat model identifier
    #[arg(long, env = "DOCQA_CHAT_MODEL")]
    pub model: Option<String>,

    /// Directory the vector index is read from
    #[arg(long, env = "DOCQA_INDEX_DIR")]
    pub index_dir: Option<PathBuf>,

    /// Abort a turn when query rewriting fails instead of searching with the raw question
    #[arg(long)]
    pub strict_rewrite: bool,

    /// Keep at most this many messages of conversation history
    #[arg(long)]
    pub max_history: Option<usize>,
}

/// Interactive question answering over the indexed documents
pub async fn run_chat(args: ChatArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let mut config = AppConfig::from_env()?;
    if let Some(model) = args.model {
        config.chat_model = model;
    }
    if let Some(index_dir) = args.index_dir {
        config.index_dir = index_dir;
    }
    config.validate()?;
    let api_key = config.require_openrouter_key()?.to_string();
    config.log_summary();

    let store = VectorStore::new(&config.index_dir);
    let index = if store.exists().await {
        store.load_for_model(&config.embed_model).await?
    } else {
        warn!(
            "No index found at {}, starting with an empty one",
            config.index_dir.display()
        );
        VectorIndex::new()
    };
    println!(
        "📖 {} chunk(s) loaded from {}",
        index.len(),
        config.index_dir.display()
    );

    let embedder: Arc<dyn Embedder> = Arc::new(CachedEmbedder::new(
        Arc::new(OllamaEmbedder::new(
            config.ollama_url.as_str(),
            config.embed_model.as_str(),
        )),
        DEFAULT_CACHE_CAPACITY,
    ));
    let completer: Arc<dyn Completer> = Arc::new(OpenRouterCompleter::new(
        config.openrouter_base_url.as_str(),
        api_key,
    ));

    let retriever = Retriever::new(embedder, index)
        .with_k(config.retrieval_k)
        .with_score_threshold(config.score_threshold);
    let rewriter = QueryRewriter::new(completer.clone(), &config.chat_model);
    let mut session = ConversationSession::new(retriever, rewriter, completer, &config.chat_model);
    if args.strict_rewrite {
        session = session.with_rewrite_policy(RewritePolicy::Abort);
    }
    if let Some(max_history) = args.max_history {
        session = session.with_max_history_messages(max_history);
    }

    println!("Ask me questions! Type 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYour question: ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            // EOF behaves like quit
            None => {
                println!("Goodbye!");
                break;
            }
        };
        let question = line.trim();

        if question.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }

        match session.ask_turn(question).await {
            Ok(turn) => {
                println!("Searching for: {}!", turn.search_query);
                println!("\n{}", turn.answer);
            }
            Err(err) => {
                error!("Turn failed ({}): {}", err.error_code(), err);
                println!("❌ {}", err.user_message());
            }
        }
    }

    Ok(())
}

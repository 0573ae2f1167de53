// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod completion;
pub mod config;
pub mod embeddings;
pub mod ingest;
pub mod qa;
pub mod vector;
pub mod version;

// Re-export main types from each module
pub use completion::{ChatMessage, Completer, CompletionError, OpenRouterCompleter, Role};
pub use config::{AppConfig, ConfigError};
pub use embeddings::{CachedEmbedder, Embedder, Embedding, EmbeddingError, OllamaEmbedder};
pub use ingest::{IngestError, IngestPipeline, IngestStats, TextChunker};
pub use qa::{
    ConversationSession, ContextAssembler, QaError, QueryRewriter, RetrievalError, Retriever,
    RewriteError, RewritePolicy, TurnResult,
};
pub use vector::{
    Document, IndexEntry, IndexError, IndexManifest, SearchHit, VectorIndex, VectorStore,
    VectorStoreError,
};

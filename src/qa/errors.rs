// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for the question-answering loop
//!
//! Every step failure is typed and surfaces to the session caller; nothing
//! is swallowed. An empty retrieval result is a valid outcome, not an error.

use thiserror::Error;

use crate::completion::CompletionError;
use crate::config::ConfigError;
use crate::embeddings::EmbeddingError;
use crate::vector::IndexError;

/// Retrieval step failed (embedding call or index query)
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The search query was empty after trimming
    #[error("Query must not be empty")]
    EmptyQuery,

    /// Embedding the query failed
    #[error("Failed to embed query: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The index rejected the query
    #[error("Vector index query failed: {0}")]
    Index(#[from] IndexError),
}

/// Rewrite completion call failed
#[derive(Error, Debug)]
#[error("Query rewrite failed: {source}")]
pub struct RewriteError {
    #[from]
    pub source: CompletionError,
}

/// Unified per-turn error surfaced by the session
#[derive(Error, Debug)]
pub enum QaError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// Final answer generation failed
    #[error("Answer generation failed: {0}")]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl QaError {
    /// Operator-facing message for the interactive loop
    pub fn user_message(&self) -> String {
        match self {
            QaError::Retrieval(RetrievalError::EmptyQuery) => {
                "Please enter a question.".to_string()
            }
            QaError::Retrieval(_) => {
                "Could not search the document index. Is the embedding server running?".to_string()
            }
            QaError::Rewrite(_) => {
                "Could not rewrite the question for search.".to_string()
            }
            QaError::Completion(CompletionError::Auth { .. }) => {
                "The completion provider rejected the API key.".to_string()
            }
            QaError::Completion(CompletionError::RateLimited) => {
                "The completion provider is rate limiting requests; try again shortly.".to_string()
            }
            QaError::Completion(_) => "Could not generate an answer.".to_string(),
            QaError::Configuration(err) => err.to_string(),
        }
    }

    /// Stable code for logging and metrics
    pub fn error_code(&self) -> &'static str {
        match self {
            QaError::Retrieval(RetrievalError::EmptyQuery) => "EMPTY_QUERY",
            QaError::Retrieval(RetrievalError::Embedding(_)) => "EMBEDDING_FAILED",
            QaError::Retrieval(RetrievalError::Index(_)) => "INDEX_QUERY_FAILED",
            QaError::Rewrite(_) => "REWRITE_FAILED",
            QaError::Completion(CompletionError::Auth { .. }) => "COMPLETION_AUTH",
            QaError::Completion(CompletionError::RateLimited) => "COMPLETION_RATE_LIMITED",
            QaError::Completion(_) => "COMPLETION_FAILED",
            QaError::Configuration(_) => "CONFIGURATION_INVALID",
        }
    }

    /// Whether retrying the same turn could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            QaError::Retrieval(RetrievalError::Embedding(EmbeddingError::Http(_))) => true,
            QaError::Rewrite(RewriteError { source }) => source.is_retryable(),
            QaError::Completion(err) => err.is_retryable(),
            _ => false,
        }
    }
}

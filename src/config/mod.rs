// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Environment-driven configuration
//!
//! Every knob has a coded default and an env override. Values are validated
//! once at startup; a bad value is a fatal `ConfigError`, not a silent
//! fallback.

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default OpenRouter API endpoint
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default chat model served through OpenRouter
pub const DEFAULT_CHAT_MODEL: &str = "openai/gpt-4o-mini";

/// Default local Ollama endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default embedding model served by Ollama
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text:v1.5";

/// Default directory for the persisted vector index
pub const DEFAULT_INDEX_DIR: &str = "db/vector_index";

/// Default directory scanned for `.txt` documents
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Default number of chunks retrieved per query
pub const DEFAULT_RETRIEVAL_K: usize = 3;

/// Default minimum cosine similarity for a retrieved chunk
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.3;

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 800;

/// Default overlap between consecutive chunks in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 0;

/// Configuration errors, fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required credential is absent
    #[error("Missing required environment variable {0}")]
    MissingKey(&'static str),

    /// An env var holds a value that does not parse as a URL
    #[error("Invalid URL in {var}: {value}")]
    InvalidUrl { var: &'static str, value: String },

    /// An env var holds a value that does not parse as a number
    #[error("Invalid number in {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },

    /// Score threshold outside the cosine similarity range
    #[error("Score threshold {0} out of range: must be within [-1.0, 1.0]")]
    ThresholdOutOfRange(f32),

    /// Retrieval cap must be at least one
    #[error("Retrieval k must be >= 1")]
    ZeroK,

    /// Chunk size must be at least one character
    #[error("Chunk size must be >= 1")]
    ZeroChunkSize,

    /// Overlap must leave the chunk window a positive step
    #[error("Chunk overlap {overlap} must be smaller than chunk size {chunk_size}")]
    OverlapTooLarge { chunk_size: usize, overlap: usize },
}

/// Application configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenRouter credential; required for chat, unused by ingestion
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub chat_model: String,
    pub ollama_url: String,
    pub embed_model: String,
    pub index_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub retrieval_k: usize,
    pub score_threshold: f32,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            retrieval_k: DEFAULT_RETRIEVAL_K,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from the environment and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok().filter(|k| !k.is_empty()),
            openrouter_base_url: env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            chat_model: env::var("DOCQA_CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            ollama_url: env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            embed_model: env::var("DOCQA_EMBED_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBED_MODEL.to_string()),
            index_dir: PathBuf::from(
                env::var("DOCQA_INDEX_DIR").unwrap_or_else(|_| DEFAULT_INDEX_DIR.to_string()),
            ),
            docs_dir: PathBuf::from(
                env::var("DOCQA_DOCS_DIR").unwrap_or_else(|_| DEFAULT_DOCS_DIR.to_string()),
            ),
            retrieval_k: parse_env("DOCQA_RETRIEVAL_K", DEFAULT_RETRIEVAL_K)?,
            score_threshold: parse_env("DOCQA_SCORE_THRESHOLD", DEFAULT_SCORE_THRESHOLD)?,
            chunk_size: parse_env("DOCQA_CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
            chunk_overlap: parse_env("DOCQA_CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate every field; called by `from_env`, also usable after overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("OPENROUTER_BASE_URL", &self.openrouter_base_url)?;
        validate_url("OLLAMA_URL", &self.ollama_url)?;

        if self.retrieval_k == 0 {
            return Err(ConfigError::ZeroK);
        }
        if !(-1.0..=1.0).contains(&self.score_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.score_threshold));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                chunk_size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }

    /// The OpenRouter key, or the startup error the chat paths surface
    pub fn require_openrouter_key(&self) -> Result<&str, ConfigError> {
        self.openrouter_api_key
            .as_deref()
            .ok_or(ConfigError::MissingKey("OPENROUTER_API_KEY"))
    }

    /// Log the effective configuration without secrets
    pub fn log_summary(&self) {
        tracing::info!(
            chat_model = %self.chat_model,
            embed_model = %self.embed_model,
            ollama_url = %self.ollama_url,
            index_dir = %self.index_dir.display(),
            docs_dir = %self.docs_dir.display(),
            k = self.retrieval_k,
            score_threshold = self.score_threshold,
            chunk_size = self.chunk_size,
            chunk_overlap = self.chunk_overlap,
            api_key_set = self.openrouter_api_key.is_some(),
            "configuration resolved"
        );
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
        Err(_) => Ok(default),
    }
}

fn validate_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
    })?;
    Ok(())
}

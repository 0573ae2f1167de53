// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Ollama embedding client
//!
//! Calls a local Ollama server's `/api/embeddings` endpoint. The server
//! returns f64 components; they are narrowed to f32 for storage and search.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Embedder, Embedding, EmbeddingError};
use async_trait::async_trait;

#[derive(Debug, Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f64>,
}

/// Embedder backed by a running Ollama instance
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: trim_trailing_slash(base_url.into()),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "cannot embed empty text".to_string(),
            ));
        }

        let url = format!("{}/api/embeddings", self.base_url);
        let request = OllamaEmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaEmbeddingResponse = response.json().await?;
        if parsed.embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse(
                "server returned an empty embedding".to_string(),
            ));
        }

        let data: Vec<f32> = parsed.embedding.iter().map(|&v| v as f32).collect();
        debug!(
            model = %self.model,
            dimension = data.len(),
            chars = text.len(),
            "embedded text"
        );

        Ok(Embedding::new(data))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

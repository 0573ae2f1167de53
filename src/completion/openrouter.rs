// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! OpenRouter chat-completions client
//!
//! Speaks the OpenAI-compatible `/chat/completions` shape with bearer auth.
//! Auth failures and rate limits are distinguished from other API errors so
//! callers can report them precisely.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, Completer, CompletionError};
use async_trait::async_trait;

/// Default OpenRouter API endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Completer backed by the OpenRouter API
pub struct OpenRouterCompleter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterCompleter {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Completer for OpenRouterCompleter {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest { model, messages };

        debug!(model, message_count = messages.len(), "requesting completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => {
                return Err(CompletionError::Auth {
                    status: status.as_u16(),
                })
            }
            429 => return Err(CompletionError::RateLimited),
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(CompletionError::Api {
                    status: status.as_u16(),
                    body,
                });
            }
            _ => {}
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyResponse)?;

        Ok(choice.message.content)
    }
}

// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Chat completion types and the `Completer` seam
//!
//! Messages carry a closed role set; serialization matches the
//! OpenAI-compatible wire shape (`"role": "user"`, lowercase).

pub mod openrouter;

pub use openrouter::OpenRouterCompleter;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role-tagged message, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Errors from a completion call
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Credential rejected by the provider
    #[error("Authentication failed (HTTP {status}): check the API key")]
    Auth { status: u16 },

    /// Provider asked us to back off
    #[error("Rate limited by completion provider (HTTP 429)")]
    RateLimited,

    /// Any other non-success status
    #[error("Completion API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure
    #[error("Completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Success status but no usable choice in the body
    #[error("Completion response contained no choices")]
    EmptyResponse,
}

impl CompletionError {
    /// Whether a caller-level retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::RateLimited | CompletionError::Http(_)
        )
    }
}

/// Maps a message sequence to a generated completion
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, CompletionError>;
}

// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! History-aware query rewriting
//!
//! Follow-up questions like "and who founded it?" are useless as search
//! queries on their own. When the conversation already has turns, the
//! rewriter asks the completion backend to restate the new question as a
//! standalone query. With no history there is nothing to resolve, so the
//! question passes through untouched and no completion call is made.

use std::sync::Arc;

use tracing::debug;

use crate::completion::{ChatMessage, Completer};
use crate::qa::errors::RewriteError;

/// Instruction for the rewrite completion call
pub const REWRITE_SYSTEM_PROMPT: &str =
    "Given the chat history, rewrite the new question to be standalone and searchable. Strictly return the rewritten question.";

/// Rewrites follow-up questions into standalone search queries
pub struct QueryRewriter {
    completer: Arc<dyn Completer>,
    model: String,
    system_prompt: String,
}

impl QueryRewriter {
    pub fn new(completer: Arc<dyn Completer>, model: &str) -> Self {
        Self {
            completer,
            model: model.to_string(),
            system_prompt: REWRITE_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the rewrite instruction
    pub fn with_system_prompt(mut self, system_prompt: &str) -> Self {
        self.system_prompt = system_prompt.to_string();
        self
    }

    /// Produce the query to search with. Reads `history` but never mutates
    /// it; an empty history short-circuits to `question` unchanged.
    pub async fn rewrite(
        &self,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, RewriteError> {
        if history.is_empty() {
            return Ok(question.to_string());
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(&self.system_prompt));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(question));

        let completion = self.completer.complete(&messages, &self.model).await?;
        let rewritten = completion.trim().to_string();

        debug!("Rewrote '{}' into '{}'", question, rewritten);
        Ok(rewritten)
    }
}

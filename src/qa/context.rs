// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Prompt assembly for answer generation
//!
//! Pure string construction: retrieved chunks are rendered into a grounding
//! prompt that instructs the model to answer only from the supplied
//! documents, and to fall back to a fixed sentence when they do not contain
//! the answer. With zero hits the document section is empty and the
//! instruction steers the model straight to the fallback sentence.

use crate::completion::ChatMessage;
use crate::vector::SearchHit;

/// Sentence the model is told to produce when the documents cannot answer
pub const FALLBACK_SENTENCE: &str =
    "I don't have enough information to answer that question based on the provided documents.";

/// System prompt for the answering call
pub const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// System and user prompt for one answering call
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    /// Render as the message list sent to the completion backend
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(&self.system),
            ChatMessage::user(&self.user),
        ]
    }
}

/// Builds the grounded answering prompt from retrieved chunks
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    system_prompt: String,
    fallback: String,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self {
            system_prompt: ANSWER_SYSTEM_PROMPT.to_string(),
            fallback: FALLBACK_SENTENCE.to_string(),
        }
    }

    pub fn fallback_sentence(&self) -> &str {
        &self.fallback
    }

    /// Assemble the prompt pair for `question` grounded on `hits`
    pub fn assemble(&self, question: &str, hits: &[SearchHit]) -> PromptPair {
        let documents = hits
            .iter()
            .map(|hit| format!("- {}", hit.document.content))
            .collect::<Vec<_>>()
            .join("\n");

        let user = format!(
            "Based on the following documents, please answer this question: {}\n\nDocuments:\n{}\n\nPlease provide a clear, helpful answer using only the information from this documents. If you can't find the answer in the documents, say \"{}\"",
            question, documents, self.fallback
        );

        PromptPair {
            system: self.system_prompt.clone(),
            user,
        }
    }
}

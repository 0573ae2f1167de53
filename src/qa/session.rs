// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Multi-turn conversation sessions
//!
//! A session owns its history and drives one question through the full
//! rewrite, retrieve, assemble, complete, record sequence. The steps are
//! strictly sequential and a turn is recorded only after the final answer
//! arrives, so any failure leaves the history exactly as it was. Turns on
//! one session are serialized through `&mut self`; independent sessions
//! share no state and can run in parallel.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::completion::{ChatMessage, Completer};
use crate::qa::context::ContextAssembler;
use crate::qa::errors::QaError;
use crate::qa::retriever::Retriever;
use crate::qa::rewrite::QueryRewriter;

/// What to do with a turn when the rewrite call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewritePolicy {
    /// Log a warning and search with the raw question instead
    #[default]
    FallbackToQuestion,
    /// Abort the turn and surface the rewrite error
    Abort,
}

/// Outcome of one completed turn
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// The generated answer
    pub answer: String,
    /// The query that was actually searched
    pub search_query: String,
    /// Whether the searched query differs from the question as asked
    pub rewritten: bool,
    /// How many chunks cleared the similarity threshold
    pub documents_retrieved: usize,
}

/// Drives the question-answering loop over a private history
pub struct ConversationSession {
    retriever: Retriever,
    rewriter: QueryRewriter,
    completer: Arc<dyn Completer>,
    model: String,
    assembler: ContextAssembler,
    rewrite_policy: RewritePolicy,
    max_history_messages: Option<usize>,
    history: Vec<ChatMessage>,
}

impl ConversationSession {
    pub fn new(
        retriever: Retriever,
        rewriter: QueryRewriter,
        completer: Arc<dyn Completer>,
        model: &str,
    ) -> Self {
        Self {
            retriever,
            rewriter,
            completer,
            model: model.to_string(),
            assembler: ContextAssembler::new(),
            rewrite_policy: RewritePolicy::default(),
            max_history_messages: None,
            history: Vec::new(),
        }
    }

    pub fn with_rewrite_policy(mut self, rewrite_policy: RewritePolicy) -> Self {
        self.rewrite_policy = rewrite_policy;
        self
    }

    /// Cap the history at `max_messages`, dropping whole turns from the
    /// front once the cap is exceeded. No cap by default.
    pub fn with_max_history_messages(mut self, max_messages: usize) -> Self {
        self.max_history_messages = Some(max_messages);
        self
    }

    /// Messages recorded so far, oldest first
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Forget all recorded turns
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Answer `question`, recording the turn on success
    pub async fn ask(&mut self, question: &str) -> Result<String, QaError> {
        self.ask_turn(question).await.map(|turn| turn.answer)
    }

    /// Answer `question` and report how the turn was executed. The history
    /// gains the original question and the answer, in that order, if and
    /// only if the completion succeeds.
    pub async fn ask_turn(&mut self, question: &str) -> Result<TurnResult, QaError> {
        let search_query = match self.rewriter.rewrite(&self.history, question).await {
            Ok(query) => query,
            Err(err) => match self.rewrite_policy {
                RewritePolicy::FallbackToQuestion => {
                    warn!("Query rewrite failed, searching with the raw question: {}", err);
                    question.to_string()
                }
                RewritePolicy::Abort => return Err(err.into()),
            },
        };

        let hits = self.retriever.retrieve(&search_query).await?;
        let prompt = self.assembler.assemble(&search_query, &hits);
        let answer = self
            .completer
            .complete(&prompt.messages(), &self.model)
            .await?;

        self.record_turn(question, &answer);

        debug!(
            "Turn complete: {} document(s) used, history now {} message(s)",
            hits.len(),
            self.history.len()
        );

        Ok(TurnResult {
            rewritten: search_query != question,
            documents_retrieved: hits.len(),
            answer,
            search_query,
        })
    }

    fn record_turn(&mut self, question: &str, answer: &str) {
        self.history.push(ChatMessage::user(question));
        self.history.push(ChatMessage::assistant(answer));

        if let Some(cap) = self.max_history_messages {
            while self.history.len() > cap {
                self.history.drain(0..2);
            }
        }
    }
}

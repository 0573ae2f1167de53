// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Question answering over indexed documents
//!
//! The retrieval-and-grounded-generation loop: rewrite the question against
//! the conversation history, retrieve matching chunks, assemble a grounding
//! prompt and generate the answer. [`ConversationSession`] ties the steps
//! together and owns the per-session history.

pub mod context;
pub mod errors;
pub mod retriever;
pub mod rewrite;
pub mod session;

// Re-export main types for convenience
pub use context::{ContextAssembler, PromptPair, ANSWER_SYSTEM_PROMPT, FALLBACK_SENTENCE};
pub use errors::{QaError, RetrievalError, RewriteError};
pub use retriever::Retriever;
pub use rewrite::{QueryRewriter, REWRITE_SYSTEM_PROMPT};
pub use session::{ConversationSession, RewritePolicy, TurnResult};

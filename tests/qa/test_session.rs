// Session turn loop: history recording, failure isolation and the
// original-question round trip.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docqa::{
    ChatMessage, Completer, CompletionError, ConversationSession, Document, Embedder, Embedding,
    EmbeddingError, QaError, QueryRewriter, Retriever, Role, VectorIndex,
};

struct FixedEmbedder;

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(Embedding::new(vec![1.0, 0.0]))
    }

    fn model_name(&self) -> &str {
        "fixed-embedder"
    }
}

struct ScriptedCompleter {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: AtomicUsize,
}

impl ScriptedCompleter {
    fn new(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completer for ScriptedCompleter {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _model: &str,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::EmptyResponse))
    }
}

fn session(completer: Arc<ScriptedCompleter>, index: VectorIndex) -> ConversationSession {
    let retriever = Retriever::new(Arc::new(FixedEmbedder), index);
    let rewriter = QueryRewriter::new(completer.clone(), "chat-model");
    ConversationSession::new(retriever, rewriter, completer, "chat-model")
}

fn indexed() -> VectorIndex {
    let mut index = VectorIndex::new();
    index
        .upsert(
            "chunk-1".to_string(),
            Document::with_source("Acme Corp was founded in 1998 by Jane Doe.", "acme.txt"),
            vec![1.0, 0.0],
        )
        .unwrap();
    index
}

#[tokio::test]
async fn test_recorded_turn_holds_the_original_question() {
    // turn 1 answer, turn 2 rewrite, turn 2 answer
    let completer = Arc::new(ScriptedCompleter::new(vec![
        Ok("Acme Corp was founded in 1998.".to_string()),
        Ok("Who founded Acme Corp?".to_string()),
        Ok("Jane Doe founded Acme Corp.".to_string()),
    ]));
    let mut s = session(completer, indexed());

    s.ask("What year was Acme Corp founded?").await.unwrap();
    let turn = s.ask_turn("And who founded it?").await.unwrap();

    // the search used the rewritten query
    assert_eq!(turn.search_query, "Who founded Acme Corp?");
    assert!(turn.rewritten);

    // but the history keeps what the user actually typed
    assert_eq!(s.history()[2].role, Role::User);
    assert_eq!(s.history()[2].content, "And who founded it?");
}

#[tokio::test]
async fn test_two_turns_record_four_messages_in_order() {
    let completer = Arc::new(ScriptedCompleter::new(vec![
        Ok("answer one".to_string()),
        Ok("standalone question".to_string()),
        Ok("answer two".to_string()),
    ]));
    let mut s = session(completer, VectorIndex::new());

    s.ask("question one").await.unwrap();
    s.ask("question two").await.unwrap();

    let history = s.history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "question one");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "answer one");
    assert_eq!(history[2].role, Role::User);
    assert_eq!(history[2].content, "question two");
    assert_eq!(history[3].role, Role::Assistant);
    assert_eq!(history[3].content, "answer two");
}

#[tokio::test]
async fn test_failed_completion_does_not_grow_history() {
    let completer = Arc::new(ScriptedCompleter::new(vec![Err(CompletionError::Api {
        status: 502,
        body: "bad gateway".to_string(),
    })]));
    let mut s = session(completer, indexed());

    let before = s.history_len();
    let err = s.ask("What year was Acme Corp founded?").await.unwrap_err();

    assert!(matches!(err, QaError::Completion(_)));
    assert_eq!(s.history_len(), before);
}

#[tokio::test]
async fn test_session_survives_a_failed_turn() {
    let completer = Arc::new(ScriptedCompleter::new(vec![
        Ok("first answer".to_string()),
        // turn 2: rewrite succeeds, answer fails
        Ok("standalone".to_string()),
        Err(CompletionError::RateLimited),
        // turn 3: rewrite and answer succeed
        Ok("standalone again".to_string()),
        Ok("third answer".to_string()),
    ]));
    let mut s = session(completer.clone(), indexed());

    s.ask("first question").await.unwrap();
    s.ask("second question").await.unwrap_err();
    let answer = s.ask("third question").await.unwrap();

    assert_eq!(answer, "third answer");
    assert_eq!(s.history_len(), 4);
    assert_eq!(s.history()[2].content, "third question");
    assert_eq!(completer.calls(), 5);
}

#[tokio::test]
async fn test_first_turn_skips_rewrite_entirely() {
    let completer = Arc::new(ScriptedCompleter::new(vec![Ok("the answer".to_string())]));
    let mut s = session(completer.clone(), indexed());

    let turn = s.ask_turn("plain question").await.unwrap();

    // exactly one completion call: the answer, no rewrite
    assert_eq!(completer.calls(), 1);
    assert_eq!(turn.search_query, "plain question");
    assert!(!turn.rewritten);
}

// The whole ingestion run against a temp docs directory and a stub
// embedding backend, checked through what lands in the store.

use std::sync::Arc;

use async_trait::async_trait;
use docqa::{
    Embedder, Embedding, EmbeddingError, IngestError, IngestPipeline, TextChunker, VectorStore,
};
use tempfile::TempDir;

struct StubEmbedder;

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let sum: u32 = text.bytes().map(u32::from).sum();
        Ok(Embedding::new(vec![
            (sum % 97) as f32 / 97.0,
            (sum % 53) as f32 / 53.0,
            1.0,
        ]))
    }

    fn model_name(&self) -> &str {
        "stub-embed"
    }
}

fn pipeline(index_dir: &std::path::Path) -> IngestPipeline {
    IngestPipeline::new(
        Arc::new(StubEmbedder),
        TextChunker::new(16, 0).unwrap(),
        VectorStore::new(index_dir),
    )
}

#[tokio::test]
async fn test_run_indexes_every_chunk_and_persists() {
    let docs = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    std::fs::write(docs.path().join("a.txt"), "x".repeat(40)).unwrap();
    std::fs::write(docs.path().join("b.txt"), "short").unwrap();

    let stats = pipeline(index_dir.path()).run(docs.path()).await.unwrap();

    // 40 chars at window 16 gives 3 chunks, plus 1 for the short file
    assert_eq!(stats.files, 2);
    assert_eq!(stats.chunks, 4);
    assert_eq!(stats.dimensions, 3);

    let store = VectorStore::new(index_dir.path());
    let index = store.load_for_model("stub-embed").await.unwrap();
    assert_eq!(index.len(), 4);
}

#[tokio::test]
async fn test_chunks_carry_source_and_position_metadata() {
    let docs = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    std::fs::write(docs.path().join("only.txt"), "x".repeat(40)).unwrap();

    pipeline(index_dir.path()).run(docs.path()).await.unwrap();

    let (index, _) = VectorStore::new(index_dir.path()).load().await.unwrap();
    for (position, entry) in index.entries().iter().enumerate() {
        assert_eq!(entry.document.source(), Some("only.txt"));
        assert_eq!(
            entry.document.source_metadata.get("chunk"),
            Some(&position.to_string())
        );
    }
}

#[tokio::test]
async fn test_chunks_are_indexed_in_document_order() {
    let docs = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    std::fs::write(docs.path().join("b.txt"), "bbbb").unwrap();
    std::fs::write(docs.path().join("a.txt"), "aaaa").unwrap();

    pipeline(index_dir.path()).run(docs.path()).await.unwrap();

    let (index, _) = VectorStore::new(index_dir.path()).load().await.unwrap();
    assert_eq!(index.entries()[0].document.source(), Some("a.txt"));
    assert_eq!(index.entries()[1].document.source(), Some("b.txt"));
}

#[tokio::test]
async fn test_rerun_replaces_the_stored_index() {
    let docs = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    std::fs::write(docs.path().join("a.txt"), "first version").unwrap();
    pipeline(index_dir.path()).run(docs.path()).await.unwrap();

    std::fs::remove_file(docs.path().join("a.txt")).unwrap();
    std::fs::write(docs.path().join("b.txt"), "second version").unwrap();
    let stats = pipeline(index_dir.path()).run(docs.path()).await.unwrap();
    assert_eq!(stats.files, 1);

    let (index, _) = VectorStore::new(index_dir.path()).load().await.unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.entries()[0].document.source(), Some("b.txt"));
}

#[tokio::test]
async fn test_missing_docs_dir_fails_before_any_embedding() {
    let index_dir = TempDir::new().unwrap();
    let err = pipeline(index_dir.path())
        .run(std::path::Path::new("/definitely/not/here"))
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::DocsDirMissing(_)));
}

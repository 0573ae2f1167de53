// Store round trips through a real temp directory, plus the embedding
// model guard that keeps the index and query in one embedding space.

use docqa::{Document, VectorIndex, VectorStore, VectorStoreError};
use tempfile::TempDir;

fn sample_index() -> VectorIndex {
    let mut index = VectorIndex::new();
    index
        .upsert(
            "a".to_string(),
            Document::with_source("alpha chunk", "alpha.txt"),
            vec![1.0, 0.0, 0.0],
        )
        .unwrap();
    index
        .upsert(
            "b".to_string(),
            Document::with_source("beta chunk", "beta.txt"),
            vec![0.0, 1.0, 0.0],
        )
        .unwrap();
    index
}

#[tokio::test]
async fn test_round_trip_preserves_entries_and_order() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path());

    let manifest = store.save(&sample_index(), "nomic-embed-text:v1.5").await.unwrap();
    assert_eq!(manifest.entry_count, 2);
    assert_eq!(manifest.dimensions, 3);

    let (loaded, loaded_manifest) = store.load().await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.entries()[0].id, "a");
    assert_eq!(loaded.entries()[0].document.source(), Some("alpha.txt"));
    assert_eq!(loaded.entries()[1].id, "b");
    assert_eq!(loaded_manifest.embedding_model, "nomic-embed-text:v1.5");
}

#[tokio::test]
async fn test_load_for_matching_model_succeeds() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path());
    store.save(&sample_index(), "nomic-embed-text:v1.5").await.unwrap();

    let index = store.load_for_model("nomic-embed-text:v1.5").await.unwrap();
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_load_for_different_model_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path());
    store.save(&sample_index(), "nomic-embed-text:v1.5").await.unwrap();

    let err = store.load_for_model("all-minilm:l6-v2").await.unwrap_err();
    match err {
        VectorStoreError::EmbedderMismatch {
            index_model,
            configured_model,
        } => {
            assert_eq!(index_model, "nomic-embed-text:v1.5");
            assert_eq!(configured_model, "all-minilm:l6-v2");
        }
        other => panic!("expected EmbedderMismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_store_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path().join("never-created"));

    assert!(!store.exists().await);
    assert!(matches!(
        store.load().await.unwrap_err(),
        VectorStoreError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_save_overwrites_previous_contents() {
    let dir = TempDir::new().unwrap();
    let store = VectorStore::new(dir.path());

    store.save(&sample_index(), "nomic-embed-text:v1.5").await.unwrap();

    let mut smaller = VectorIndex::new();
    smaller
        .upsert("only".to_string(), Document::new("only chunk"), vec![1.0, 0.0, 0.0])
        .unwrap();
    store.save(&smaller, "nomic-embed-text:v1.5").await.unwrap();

    let (loaded, manifest) = store.load().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(manifest.entry_count, 1);
    assert_eq!(loaded.entries()[0].id, "only");
}

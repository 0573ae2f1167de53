// Chunking: window stepping, overlap, tail handling and multibyte safety.

use docqa::{IngestError, TextChunker};

#[test]
fn test_text_shorter_than_chunk_size_is_one_chunk() {
    let chunker = TextChunker::new(100, 0).unwrap();
    let chunks = chunker.split("short text");
    assert_eq!(chunks, vec!["short text".to_string()]);
}

#[test]
fn test_exact_multiple_produces_full_chunks_only() {
    let chunker = TextChunker::new(4, 0).unwrap();
    let chunks = chunker.split("abcdefgh");
    assert_eq!(chunks, vec!["abcd".to_string(), "efgh".to_string()]);
}

#[test]
fn test_tail_shorter_than_chunk_size_is_kept() {
    let chunker = TextChunker::new(4, 0).unwrap();
    let chunks = chunker.split("abcdefghij");
    assert_eq!(
        chunks,
        vec!["abcd".to_string(), "efgh".to_string(), "ij".to_string()]
    );
}

#[test]
fn test_overlap_repeats_the_window_edge() {
    let chunker = TextChunker::new(4, 2).unwrap();
    let chunks = chunker.split("abcdefgh");
    // step of 2: windows start at 0, 2, 4; the last window reaches the end
    assert_eq!(
        chunks,
        vec!["abcd".to_string(), "cdef".to_string(), "efgh".to_string()]
    );
}

#[test]
fn test_empty_input_yields_no_chunks() {
    let chunker = TextChunker::new(10, 0).unwrap();
    assert!(chunker.split("").is_empty());
}

#[test]
fn test_multibyte_text_is_split_on_character_boundaries() {
    let chunker = TextChunker::new(2, 0).unwrap();
    let chunks = chunker.split("héllo wörld");
    assert_eq!(chunks.first().unwrap(), "hé");
    // every chunk is valid UTF-8 by construction and re-joins to the input
    assert_eq!(chunks.concat(), "héllo wörld");
}

#[test]
fn test_zero_chunk_size_is_rejected() {
    let err = TextChunker::new(0, 0).unwrap_err();
    assert!(matches!(err, IngestError::InvalidChunking { .. }));
}

#[test]
fn test_overlap_must_be_smaller_than_chunk_size() {
    assert!(TextChunker::new(4, 4).is_err());
    assert!(TextChunker::new(4, 5).is_err());
    assert!(TextChunker::new(4, 3).is_ok());
}

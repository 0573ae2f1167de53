// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Fixed-size character chunking
//!
//! Windows are measured in characters, never bytes, so a chunk boundary can
//! never split a UTF-8 code point. The final chunk may be shorter than the
//! window; it is kept.

use super::IngestError;

/// Splits text into fixed-size character windows with optional overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Overlap must be strictly smaller than the chunk size so every window
    /// advances.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, IngestError> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(IngestError::InvalidChunking {
                chunk_size,
                overlap,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into chunks; empty input yields no chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = usize::min(start + self.chunk_size, chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! In-memory vector index with exact cosine search
//!
//! Entries are kept in insertion order and search uses a stable sort, so
//! equal scores keep their insertion order and repeated queries against an
//! unchanged index return identical rankings. Exact brute-force scoring is
//! deliberate at this corpus size; approximate indexes trade away the
//! ordering guarantees for speed this workload does not need.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable unit of retrieved knowledge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub source_metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source_metadata: HashMap::new(),
        }
    }

    pub fn with_source(content: impl Into<String>, source: impl Into<String>) -> Self {
        let mut source_metadata = HashMap::new();
        source_metadata.insert("source".to_string(), source.into());
        Self {
            content: content.into(),
            source_metadata,
        }
    }

    /// Origin file name, when the ingester recorded one
    pub fn source(&self) -> Option<&str> {
        self.source_metadata.get("source").map(String::as_str)
    }
}

/// Entry stored in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub document: Document,
    pub embedding: Vec<f32>,
}

/// One search match with its similarity score
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub document: Document,
    pub score: f32,
}

/// Errors from index mutation or search
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Dimension mismatch: index stores {expected}D vectors, got {actual}D")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector contains NaN or Infinity (all values must be finite numbers)")]
    NonFinite,

    #[error("Vector must not be empty")]
    EmptyVector,
}

/// In-memory cosine similarity index
#[derive(Debug, Default)]
pub struct VectorIndex {
    dimension: Option<usize>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from persisted entries, validating consistency
    pub fn from_entries(entries: Vec<IndexEntry>) -> Result<Self, IndexError> {
        let mut index = Self::new();
        for entry in entries {
            index.upsert(entry.id, entry.document, entry.embedding)?;
        }
        Ok(index)
    }

    /// Insert a new entry or replace the entry with the same id in place
    ///
    /// Replacement keeps the entry's original position so insertion order
    /// stays meaningful for tie-breaks.
    pub fn upsert(
        &mut self,
        id: String,
        document: Document,
        embedding: Vec<f32>,
    ) -> Result<(), IndexError> {
        if embedding.is_empty() {
            return Err(IndexError::EmptyVector);
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(IndexError::NonFinite);
        }
        match self.dimension {
            Some(expected) if expected != embedding.len() => {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
            Some(_) => {}
            None => self.dimension = Some(embedding.len()),
        }

        let entry = IndexEntry {
            id,
            document,
            embedding,
        };
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Top-k entries by cosine similarity, filtered by an optional floor
    ///
    /// Results are sorted by descending score; equal scores keep insertion
    /// order. An empty result is a valid outcome.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<SearchHit>, IndexError> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let dimension = self.dimension.unwrap_or(0);
        if query.len() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                id: entry.id.clone(),
                document: entry.document.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .filter(|hit| !hit.score.is_nan())
            .collect();

        if let Some(floor) = min_score {
            hits.retain(|hit| hit.score >= floor);
        }

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        Ok(hits)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension fixed by the first inserted vector; None while empty
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

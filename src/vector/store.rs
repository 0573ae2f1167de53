// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Directory-backed index persistence
//!
//! Layout: `<dir>/manifest.json` describes the stored index (format version,
//! embedding model, dimensions, entry count); `<dir>/entries.json` holds the
//! entries in insertion order. The manifest pins the embedding space: loading
//! against a differently-configured embedder is a typed error, never a silent
//! mix of vector spaces.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::index::{IndexEntry, VectorIndex};
use super::IndexError;

/// Manifest file name inside the store directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Entries file name inside the store directory
pub const ENTRIES_FILE: &str = "entries.json";

/// On-disk format version written by this build
pub const STORE_VERSION: u32 = 1;

/// Describes a persisted index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    /// On-disk format version
    pub version: u32,

    /// Embedding model that produced every stored vector
    pub embedding_model: String,

    /// Vector dimensions; 0 only when the index is empty
    pub dimensions: usize,

    /// Number of stored entries
    pub entry_count: usize,

    /// Creation timestamp (Unix milliseconds)
    pub created: i64,
}

impl IndexManifest {
    /// Structural validation, independent of the entries file
    pub fn validate(&self) -> Result<(), VectorStoreError> {
        if self.embedding_model.is_empty() {
            return Err(VectorStoreError::InvalidManifest(
                "embedding model must not be empty".to_string(),
            ));
        }
        if self.entry_count > 0 && self.dimensions == 0 {
            return Err(VectorStoreError::InvalidManifest(format!(
                "{} entries recorded but dimensions is 0",
                self.entry_count
            )));
        }
        Ok(())
    }
}

/// Errors from persisting or loading an index
#[derive(Error, Debug)]
pub enum VectorStoreError {
    /// No store exists at the directory
    #[error("No vector index found at: {0}")]
    NotFound(String),

    /// Manifest exists but the entries file is gone
    #[error("Index entries file missing at: {0}")]
    EntriesMissing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse index file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Written by a different format version
    #[error("Unsupported index version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Structurally inconsistent manifest
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Index was built with a different embedding model
    #[error(
        "Embedding model mismatch: index was built with '{index_model}' but '{configured_model}' is configured"
    )]
    EmbedderMismatch {
        index_model: String,
        configured_model: String,
    },

    /// Entries disagree with the manifest's dimension claim
    #[error("Dimension mismatch: manifest says {manifest}D, entries are {actual}D")]
    DimensionMismatch { manifest: usize, actual: usize },

    /// Entries disagree with the manifest's entry count
    #[error("Entry count mismatch: manifest says {manifest}, found {actual}")]
    CountMismatch { manifest: usize, actual: usize },

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Persists a `VectorIndex` under one directory
#[derive(Debug, Clone)]
pub struct VectorStore {
    dir: PathBuf,
}

impl VectorStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a manifest exists at the store directory
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(self.dir.join(MANIFEST_FILE))
            .await
            .unwrap_or(false)
    }

    /// Write the index and its manifest, replacing any previous store
    pub async fn save(
        &self,
        index: &VectorIndex,
        embedding_model: &str,
    ) -> Result<IndexManifest, VectorStoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let manifest = IndexManifest {
            version: STORE_VERSION,
            embedding_model: embedding_model.to_string(),
            dimensions: index.dimension().unwrap_or(0),
            entry_count: index.len(),
            created: chrono::Utc::now().timestamp_millis(),
        };
        manifest.validate()?;

        let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;
        let entries_bytes = serde_json::to_vec(index.entries())?;
        tokio::fs::write(self.dir.join(MANIFEST_FILE), manifest_bytes).await?;
        tokio::fs::write(self.dir.join(ENTRIES_FILE), entries_bytes).await?;

        info!(
            dir = %self.dir.display(),
            entries = manifest.entry_count,
            dimensions = manifest.dimensions,
            model = %manifest.embedding_model,
            "saved vector index"
        );
        Ok(manifest)
    }

    /// Load the index and its manifest, validating both
    pub async fn load(&self) -> Result<(VectorIndex, IndexManifest), VectorStoreError> {
        let manifest_path = self.dir.join(MANIFEST_FILE);
        let manifest_bytes = match tokio::fs::read(&manifest_path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(VectorStoreError::NotFound(self.dir.display().to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let manifest: IndexManifest = serde_json::from_slice(&manifest_bytes)?;

        if manifest.version != STORE_VERSION {
            return Err(VectorStoreError::UnsupportedVersion {
                found: manifest.version,
                supported: STORE_VERSION,
            });
        }
        manifest.validate()?;

        let entries_path = self.dir.join(ENTRIES_FILE);
        let entries_bytes = match tokio::fs::read(&entries_path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(VectorStoreError::EntriesMissing(
                    entries_path.display().to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        };
        let entries: Vec<IndexEntry> = serde_json::from_slice(&entries_bytes)?;

        if entries.len() != manifest.entry_count {
            return Err(VectorStoreError::CountMismatch {
                manifest: manifest.entry_count,
                actual: entries.len(),
            });
        }

        let index = VectorIndex::from_entries(entries)?;
        let actual_dimensions = index.dimension().unwrap_or(0);
        if actual_dimensions != manifest.dimensions {
            return Err(VectorStoreError::DimensionMismatch {
                manifest: manifest.dimensions,
                actual: actual_dimensions,
            });
        }

        info!(
            dir = %self.dir.display(),
            entries = index.len(),
            model = %manifest.embedding_model,
            "loaded vector index"
        );
        Ok((index, manifest))
    }

    /// Load and reject an index built with a different embedding model
    pub async fn load_for_model(&self, model: &str) -> Result<VectorIndex, VectorStoreError> {
        let (index, manifest) = self.load().await?;
        if manifest.embedding_model != model {
            return Err(VectorStoreError::EmbedderMismatch {
                index_model: manifest.embedding_model,
                configured_model: model.to_string(),
            });
        }
        Ok(index)
    }
}

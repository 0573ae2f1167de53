// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
pub mod index;
pub mod store;

// Re-export commonly used types from index module
pub use index::{Document, IndexEntry, IndexError, SearchHit, VectorIndex};

// Re-export persistence types
pub use store::{IndexManifest, VectorStore, VectorStoreError};

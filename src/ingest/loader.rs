// Copyright (c) 2025 Docqa
// SPDX-License-Identifier: BUSL-1.1
//! Plain-text document loading
//!
//! Reads every `.txt` file in the docs directory, sorted by file name so
//! ingestion order (and therefore index insertion order) is reproducible.
//! A missing directory and a directory with no `.txt` files are distinct
//! errors; both point the operator at the fix.

use std::path::Path;

use tracing::debug;

use super::IngestError;

/// One loaded source file
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub file_name: String,
    pub content: String,
}

/// Load all `.txt` files from `dir`, sorted by file name
pub async fn load_text_documents(dir: &Path) -> Result<Vec<LoadedDocument>, IngestError> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Err(IngestError::DocsDirMissing(dir.display().to_string()));
    }

    let mut paths = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let path = entry.path();
        let is_txt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if path.is_file() && is_txt {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(IngestError::NoDocuments(dir.display().to_string()));
    }

    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read_to_string(&path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(file = %file_name, chars = content.len(), "loaded document");
        documents.push(LoadedDocument { file_name, content });
    }

    Ok(documents)
}

// Version information for Docqa

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-history-aware-chat-2026-08-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Major version number
pub const VERSION_MAJOR: u32 = 0;

/// Minor version number
pub const VERSION_MINOR: u32 = 1;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2026-08-18";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "text-ingestion",
    "fixed-size-chunking",
    "ollama-embeddings",
    "embedding-cache",
    "cosine-retrieval",
    "score-threshold",
    "grounded-answers",
    "history-aware-rewrite",
    "openrouter-chat",
    "directory-persistence",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Docqa {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for diagnostics
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}

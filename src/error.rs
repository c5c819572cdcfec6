use std::path::PathBuf;
use thiserror::Error;

/// The main error type for designsync operations.
///
/// The canonicalization and diff core is total; errors only arise where
/// files are read or written.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {kind} JSON from {path}: {source}")]
    JsonParse {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Layout integrity check failed: {count} node(s) lost auto layout")]
    LayoutIntegrity { count: usize },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

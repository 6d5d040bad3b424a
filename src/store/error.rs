// Tokensync — Store error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cannot scan root directory {root}: {source}")]
    Scan {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Write-back failed for {} of {attempted} store file(s): {}", .failed.len(), .failed.join(", "))]
    WriteBack {
        failed: Vec<String>,
        attempted: usize,
    },

    #[error("{0}")]
    Other(String),
}

// Tokensync — Top-level error types
//
// Aggregates store errors and CLI I/O failures into a single error enum
// for the application boundary.

use thiserror::Error;

/// Top-level error type for all Tokensync operations.
#[derive(Debug, Error)]
pub enum TokensyncError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TokensyncError>;

//! Error types for the deadline extractor.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An upstream stage handed out spans or regions that break ordering.
    /// Aborts the current request only.
    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Recognizer error: {0}")]
    Recognizer(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

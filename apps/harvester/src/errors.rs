use thiserror::Error;

/// Application-level error type for caller misuse and the IO edge.
/// Snapshot misses and navigation failures never surface here; they
/// degrade to empty or placeholder output instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the query encoder, from loading through inference.
///
/// Crosses the worker boundary as
/// [`WorkerFailure::Encoder`](crate::worker::WorkerFailure::Encoder).
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// A model directory or one of its files does not exist.
    #[error("query encoder files not found at {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load query encoder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("query encoding failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("query tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    /// The encoder config is unusable, e.g. a zero sequence length or an output
    /// narrower than the stored embeddings.
    #[error("invalid encoder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}

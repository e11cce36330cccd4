use thiserror::Error;

use crate::source::LoadError;
use crate::worker::WorkerFailure;

/// Every failure surfaced by [`SemanticSearch`](super::SemanticSearch) and
/// [`WorkerClient`](crate::worker::WorkerClient).
#[derive(Debug, Error)]
pub enum SearchError {
    /// Scores were requested for a key whose set was never loaded.
    #[error("no embeddings loaded for key {key:?}")]
    UnknownKey { key: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("degenerate query embedding: {reason}")]
    DegenerateEmbedding { reason: String },

    #[error("query encoder failed: {reason}")]
    Encoder { reason: String },

    /// The worker could not decode an embedding set.
    #[error("failed to decode embeddings: {reason}")]
    Decode { reason: String },

    /// The embedding-set file could not be fetched or parsed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The worker is gone. Affects every pending and future request of that client.
    #[error("search worker unavailable: {reason}")]
    Transport { reason: String },

    #[error("unexpected worker response: {kind}")]
    UnexpectedResponse { kind: &'static str },
}

impl SearchError {
    pub(crate) fn worker_gone() -> Self {
        SearchError::Transport {
            reason: "worker terminated".to_string(),
        }
    }

    /// `true` for failures that make the worker unusable.
    pub fn is_transport(&self) -> bool {
        matches!(self, SearchError::Transport { .. })
    }
}

impl From<WorkerFailure> for SearchError {
    fn from(failure: WorkerFailure) -> Self {
        match failure {
            WorkerFailure::UnknownKey { key } => SearchError::UnknownKey { key },
            WorkerFailure::Dimension { expected, actual } => {
                SearchError::Dimension { expected, actual }
            }
            WorkerFailure::DegenerateEmbedding { message } => {
                SearchError::DegenerateEmbedding { reason: message }
            }
            WorkerFailure::Encoder { message } => SearchError::Encoder { reason: message },
            WorkerFailure::Decode { message } => SearchError::Decode { reason: message },
        }
    }
}

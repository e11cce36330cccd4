use thiserror::Error;

/// Errors produced while quantizing or decoding an [`EmbeddingVector`](super::EmbeddingVector).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantizeError {
    /// Input has the wrong number of components (or bytes).
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    /// Input cannot be normalized (zero norm or non-finite components).
    #[error("degenerate embedding: {reason}")]
    DegenerateEmbedding { reason: String },

    /// Wire encoding could not be decoded.
    #[error("invalid base64 embedding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

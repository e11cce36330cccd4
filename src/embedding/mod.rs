//! Query encoder: the opaque `text → Vec<f32>` collaborator.
//!
//! - [`BertEncoder`] runs a BERT sentence encoder through candle.
//! - [`StubEncoder`] produces deterministic vectors without model files.
//!
//! Encoders are synchronous and may be slow; the worker calls them from the blocking
//! thread pool. Loading goes through [`EncoderLoader`] so the worker can defer it
//! until the first query needs it.

/// BERT sentence encoder.
pub mod bert;
/// Encoder configuration.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Deterministic stub encoder.
pub mod stub;
/// Tokenizer loading and vector helpers.
pub mod utils;


use std::sync::Arc;

pub use bert::BertEncoder;
pub use config::{DEFAULT_MAX_SEQ_LEN, EncoderConfig};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEncoder, MockLoader};
pub use stub::{STUB_OUTPUT_DIM, StubEncoder};

/// Maps text to a full-precision embedding.
///
/// Output must have at least [`EMBEDDING_DIM`](crate::constants::EMBEDDING_DIM)
/// components; the quantizer truncates the rest.
pub trait Encoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Number of components [`encode`](Encoder::encode) returns.
    fn output_dim(&self) -> usize;
}

/// Produces an [`Encoder`]. Called at most once per successful load.
pub trait EncoderLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn Encoder>, EmbeddingError>;
}

impl<F> EncoderLoader for F
where
    F: Fn() -> Result<Arc<dyn Encoder>, EmbeddingError> + Send + Sync,
{
    fn load(&self) -> Result<Arc<dyn Encoder>, EmbeddingError> {
        self()
    }
}

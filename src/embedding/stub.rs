use tracing::debug;

use super::Encoder;
use super::error::EmbeddingError;
use super::utils::l2_normalize;

/// Output width of the stub encoder (matches small BERT sentence encoders).
pub const STUB_OUTPUT_DIM: usize = 384;

/// Deterministic model-free encoder.
///
/// Seeds a linear congruential generator from the BLAKE3 hash of the text, so the same
/// text always maps to the same unit vector. Unrelated texts land roughly orthogonal.
#[derive(Debug, Clone)]
pub struct StubEncoder {
    output_dim: usize,
}

impl Default for StubEncoder {
    fn default() -> Self {
        Self {
            output_dim: STUB_OUTPUT_DIM,
        }
    }
}

impl StubEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dim(output_dim: usize) -> Self {
        Self { output_dim }
    }
}

impl Encoder for StubEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), "Generating stub embedding");

        let hash = blake3::hash(text.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&hash.as_bytes()[..8]);
        let mut state = u64::from_le_bytes(seed);

        let mut embedding = Vec::with_capacity(self.output_dim);
        for _ in 0..self.output_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }
}

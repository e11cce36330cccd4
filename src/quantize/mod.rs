//! Float → int8 embedding quantization.
//!
//! Encoder outputs are truncated to [`EMBEDDING_DIM`] components, renormalized to unit
//! length and mapped linearly from `[RANGE_MIN, RANGE_MAX]` onto the 256 int8 codes.
//! Components outside the range saturate at `-128` / `127`; normalized embeddings
//! concentrate near zero, so the narrow range buys resolution where it matters.

mod error;
mod vector;


pub use error::QuantizeError;
pub use vector::EmbeddingVector;

use crate::constants::{EMBEDDING_DIM, QUANT_STEP, RANGE_MAX, RANGE_MIN};

/// Quantizes a full-precision embedding with at least [`EMBEDDING_DIM`] components.
///
/// Fails with [`QuantizeError::Dimension`] when the input is too short and with
/// [`QuantizeError::DegenerateEmbedding`] when the truncated prefix has zero norm or
/// contains a non-finite value.
pub fn quantize(embedding: &[f32]) -> Result<EmbeddingVector, QuantizeError> {
    if embedding.len() < EMBEDDING_DIM {
        return Err(QuantizeError::Dimension {
            expected: EMBEDDING_DIM,
            actual: embedding.len(),
        });
    }

    let truncated = &embedding[..EMBEDDING_DIM];

    if let Some(index) = truncated.iter().position(|x| !x.is_finite()) {
        return Err(QuantizeError::DegenerateEmbedding {
            reason: format!("non-finite component at index {index}"),
        });
    }

    let norm = truncated
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt();

    if norm == 0.0 || !norm.is_finite() {
        return Err(QuantizeError::DegenerateEmbedding {
            reason: "zero norm after truncation".to_string(),
        });
    }

    let mut components = [0i8; EMBEDDING_DIM];
    for (slot, &x) in components.iter_mut().zip(truncated) {
        *slot = quantize_component((f64::from(x) / norm) as f32);
    }

    Ok(EmbeddingVector::from_components(components))
}

/// Maps a single normalized component onto its int8 code.
///
/// Rounds half-up, matching the producer of the stored embedding sets.
#[inline]
pub fn quantize_component(x: f32) -> i8 {
    let clamped = x.clamp(RANGE_MIN, RANGE_MAX);
    let code = ((clamped - RANGE_MIN) / QUANT_STEP - 128.0 + 0.5).floor();
    code.clamp(f32::from(i8::MIN), f32::from(i8::MAX)) as i8
}

/// Maps each code back to the float value it represents.
pub fn dequantize(vector: &EmbeddingVector) -> Vec<f32> {
    vector
        .as_slice()
        .iter()
        .map(|&q| RANGE_MIN + (f32::from(q) + 128.0) * QUANT_STEP)
        .collect()
}

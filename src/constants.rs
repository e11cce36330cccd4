//! Protocol constants shared with the offline embedding pipeline.
//!
//! The embedding sets served as static assets are produced by a separate
//! pipeline that quantizes with exactly these parameters. Changing any of them
//! here without regenerating those assets makes every similarity meaningless,
//! so none of them are exposed through [`crate::config::Config`].

/// Number of int8 components in every stored and query vector.
pub const EMBEDDING_DIM: usize = 256;

/// Lower bound of the quantization range (inclusive).
pub const RANGE_MIN: f32 = -0.3;

/// Upper bound of the quantization range (inclusive).
pub const RANGE_MAX: f32 = 0.3;

/// Width of a single quantization bucket.
pub const QUANT_STEP: f32 = (RANGE_MAX - RANGE_MIN) / 255.0;

/// Multiplier on the score standard deviation when computing the threshold.
pub const STD_FACTOR: f32 = 1.5;

/// Absolute floor for the adaptive threshold.
pub const MIN_SCORE: f32 = 0.25;

/// Maximum number of results returned for a query.
pub const RESULT_TOPK: usize = 20;

/// Instruction prepended to every query before encoding.
pub const QUERY_INSTRUCTION: &str = "Represent this sentence for searching relevant passages: ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quant_step_spans_255_buckets() {
        let span = QUANT_STEP * 255.0;
        assert!((span - (RANGE_MAX - RANGE_MIN)).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_floor_is_positive() {
        assert!(MIN_SCORE > 0.0 && MIN_SCORE < 1.0);
    }
}

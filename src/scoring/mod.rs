//! Query scoring: int8 cosine similarity and adaptive result selection.
//!
//! [`cosine_similarity_i8`] works directly on the quantized codes so scoring a whole
//! embedding set never dequantizes. [`select`] then turns the full candidate list for a
//! query into a short ranked result using a threshold derived from that query's own
//! score distribution:
//!
//! ```text
//! threshold = max(p90, mean + STD_FACTOR * std, MIN_SCORE)
//! ```
//!
//! If nothing clears the threshold the top [`RESULT_TOPK`](crate::constants::RESULT_TOPK)
//! candidates are returned instead, so a non-empty candidate list never yields an
//! empty result.

pub mod selector;
pub mod similarity;
pub mod types;

#[cfg(test)]
mod tests;

pub use selector::{Selection, SelectionStats, select, select_scores};
pub use similarity::cosine_similarity_i8;
pub use types::ScoreResult;

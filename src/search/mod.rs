//! Caller-side integration: the [`SemanticSearch`] facade plus helpers for consuming
//! its results.
//!
//! ```no_run
//! use std::sync::Arc;
//! use lodestar::embedding::EncoderConfig;
//! use lodestar::search::SemanticSearch;
//! use lodestar::source::AssetSource;
//! use lodestar::worker::WorkerOptions;
//!
//! # async fn run() -> Result<(), lodestar::search::SearchError> {
//! let search = SemanticSearch::new(
//!     AssetSource::from_base("./public"),
//!     Arc::new(EncoderConfig::stub()),
//!     WorkerOptions::default(),
//! );
//! search.ensure_embeddings_loaded("archive", "embeddings/archive.json").await?;
//! for hit in search.get_scores("archive", "slime farm").await? {
//!     println!("{hit}");
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod facade;
pub mod merge;
pub mod staleness;


pub use error::SearchError;
pub use facade::SemanticSearch;
pub use merge::{MatchOrigin, MergedMatch, merge_with_lexical, normalize_identifier};
pub use staleness::{QueryTicket, QueryTracker};

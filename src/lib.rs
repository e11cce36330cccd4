//! Lodestar: on-device semantic ranking of archive and dictionary entries.
//!
//! # Public API Surface
//!
//! ## Facade
//! - [`SemanticSearch`] - `ensure_embeddings_loaded` / `get_scores`, the calls an
//!   application makes
//! - [`SearchError`] - every failure the facade surfaces
//!
//! ## Ranking core
//! - [`quantize()`], [`EmbeddingVector`] - float → int8 quantization
//! - [`cosine_similarity_i8`] - similarity on int8 vectors
//! - [`select`], [`select_scores`] - distribution-relative result selection
//!
//! ## Worker boundary
//! - [`Worker`], [`WorkerClient`] - actor owning the encoder and embedding sets, and its
//!   request/response client
//! - [`Request`], [`Response`] - wire messages
//!
//! ## Collaborators
//! - [`Encoder`], [`BertEncoder`], [`StubEncoder`] - query encoders
//! - [`EmbeddingSource`], [`HttpSource`], [`FileSource`] - embedding-set fetchers
//! - [`Config`] - `LODESTAR_*` environment configuration
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod quantize;
pub mod scoring;
pub mod search;
pub mod source;
pub mod worker;

pub use config::{Config, ConfigError};
pub use constants::{
    EMBEDDING_DIM, MIN_SCORE, QUERY_INSTRUCTION, RANGE_MAX, RANGE_MIN, RESULT_TOPK, STD_FACTOR,
};
pub use embedding::{BertEncoder, EmbeddingError, Encoder, EncoderConfig, EncoderLoader, StubEncoder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockEncoder, MockLoader};
pub use quantize::{EmbeddingVector, QuantizeError, dequantize, quantize};
pub use scoring::{
    ScoreResult, Selection, SelectionStats, cosine_similarity_i8, select, select_scores,
};
pub use search::{
    MatchOrigin, MergedMatch, QueryTicket, QueryTracker, SearchError, SemanticSearch,
    merge_with_lexical,
};
#[cfg(any(test, feature = "mock"))]
pub use source::MockSource;
pub use source::{AssetSource, EmbeddingSource, FileSource, HttpSource, LoadError};
pub use worker::{
    RawEmbeddingEntry, Request, RequestId, Response, Worker, WorkerClient, WorkerEvent,
    WorkerFailure, WorkerOptions,
};

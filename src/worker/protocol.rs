//! Messages exchanged between [`WorkerClient`](super::WorkerClient) and
//! [`Worker`](super::Worker).
//!
//! The JSON form of every message is tagged by `type` with camelCase names and fields:
//!
//! ```json
//! {"type":"getScores","requestId":"8c0e…","key":"archive","query":"piston door"}
//! {"type":"getScoresError","requestId":"8c0e…","error":{"kind":"unknownKey","key":"archive"}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::embedding::EmbeddingError;
use crate::quantize::QuantizeError;
use crate::scoring::ScoreResult;

/// Correlates a request with its response. Rendered as a hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One entry of an embedding-set file, as produced offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmbeddingEntry {
    pub identifier: String,
    /// Base64 of the 256-byte int8 buffer.
    pub embedding: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    /// Replace (or create) the embedding set stored under `key`.
    SetEmbeddings {
        request_id: RequestId,
        key: String,
        entries: Vec<RawEmbeddingEntry>,
    },
    /// Rank the set stored under `key` against `query`.
    GetScores {
        request_id: RequestId,
        key: String,
        query: String,
    },
}

impl Request {
    pub fn request_id(&self) -> RequestId {
        match self {
            Request::SetEmbeddings { request_id, .. } | Request::GetScores { request_id, .. } => {
                *request_id
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Response {
    SetEmbeddingsComplete {
        request_id: RequestId,
    },
    SetEmbeddingsError {
        request_id: RequestId,
        error: WorkerFailure,
    },
    GetScoresComplete {
        request_id: RequestId,
        scores: Vec<ScoreResult>,
    },
    GetScoresError {
        request_id: RequestId,
        error: WorkerFailure,
    },
    /// Unsolicited; sent once when the query encoder finishes loading.
    ModelLoaded,
}

impl Response {
    /// `None` for unsolicited messages.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Response::SetEmbeddingsComplete { request_id }
            | Response::SetEmbeddingsError { request_id, .. }
            | Response::GetScoresComplete { request_id, .. }
            | Response::GetScoresError { request_id, .. } => Some(*request_id),
            Response::ModelLoaded => None,
        }
    }

    /// Short message name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Response::SetEmbeddingsComplete { .. } => "setEmbeddingsComplete",
            Response::SetEmbeddingsError { .. } => "setEmbeddingsError",
            Response::GetScoresComplete { .. } => "getScoresComplete",
            Response::GetScoresError { .. } => "getScoresError",
            Response::ModelLoaded => "modelLoaded",
        }
    }
}

/// A per-request failure reported by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WorkerFailure {
    #[error("no embeddings loaded for key {key:?}")]
    UnknownKey { key: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("degenerate query embedding: {message}")]
    DegenerateEmbedding { message: String },

    #[error("query encoder failed: {message}")]
    Encoder { message: String },

    #[error("failed to decode embeddings: {message}")]
    Decode { message: String },
}

impl From<QuantizeError> for WorkerFailure {
    fn from(err: QuantizeError) -> Self {
        match err {
            QuantizeError::Dimension { expected, actual } => {
                WorkerFailure::Dimension { expected, actual }
            }
            QuantizeError::DegenerateEmbedding { reason } => {
                WorkerFailure::DegenerateEmbedding { message: reason }
            }
            QuantizeError::InvalidEncoding(e) => WorkerFailure::Decode {
                message: e.to_string(),
            },
        }
    }
}

impl From<EmbeddingError> for WorkerFailure {
    fn from(err: EmbeddingError) -> Self {
        WorkerFailure::Encoder {
            message: err.to_string(),
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Failure to fetch, parse or decode an embedding-set file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request for embedding set failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to load embeddings: HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid embedding set JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid asset path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The file parsed, but the worker rejected one of its embeddings.
    #[error("failed to decode embedding set: {reason}")]
    Decode { reason: String },
}

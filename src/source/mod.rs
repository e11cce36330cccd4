//! Where embedding-set files come from.
//!
//! A set file is a JSON array of `{"identifier": …, "embedding": <base64>}` produced
//! offline by the same quantizer the worker uses for queries.

mod error;
pub mod file;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

use std::future::Future;

pub use error::LoadError;
pub use file::FileSource;
pub use http::{HttpSource, join_asset_url};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;

use crate::worker::RawEmbeddingEntry;

/// Fetches the raw entries of an embedding set by relative path.
pub trait EmbeddingSource: Send + Sync {
    fn fetch(
        &self,
        rel_path: &str,
    ) -> impl Future<Output = Result<Vec<RawEmbeddingEntry>, LoadError>> + Send;
}

/// Source picked from a single base string: `http(s)://` URLs go over HTTP, anything
/// else is a local directory.
#[derive(Debug, Clone)]
pub enum AssetSource {
    Http(HttpSource),
    File(FileSource),
}

impl AssetSource {
    pub fn from_base(base: &str) -> Self {
        if base.starts_with("http://") || base.starts_with("https://") {
            AssetSource::Http(HttpSource::new(base))
        } else {
            AssetSource::File(FileSource::new(base))
        }
    }
}

impl EmbeddingSource for AssetSource {
    async fn fetch(&self, rel_path: &str) -> Result<Vec<RawEmbeddingEntry>, LoadError> {
        match self {
            AssetSource::Http(source) => source.fetch(rel_path).await,
            AssetSource::File(source) => source.fetch(rel_path).await,
        }
    }
}
